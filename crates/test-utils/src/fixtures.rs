//! Common test fixtures: embedded grid metadata and reference extents.

/// `StructMetadata.0` excerpts as found in HDF-EOS grid products.
pub mod metadata {
    /// MODIS land tile h08v05 at 500 m (sinusoidal, one grid).
    pub const MODIS_H08V05: &str = "GROUP=SwathStructure
END_GROUP=SwathStructure
GROUP=GridStructure
\tGROUP=GRID_1
\t\tGridName=\"MOD_Grid_500m_Surface_Reflectance\"
\t\tXDim=2400
\t\tYDim=2400
\t\tUpperLeftPointMtrs=(-11119505.196667,4447802.078667)
\t\tLowerRightMtrs=(-10007554.677000,3335851.559000)
\t\tProjection=GCTP_SNSOID
\t\tProjParams=(6371007.181000,0,0,0,0,0,0,0,0,0,0,0,0)
\t\tSphereCode=-1
\t\tGridOrigin=HDFE_GD_UL
\t\tGROUP=Dimension
\t\tEND_GROUP=Dimension
\t\tGROUP=DataField
\t\t\tOBJECT=DataField_1
\t\t\t\tDataFieldName=\"sur_refl_b01_1\"
\t\t\t\tDataType=DFNT_INT16
\t\t\t\tDimList=(\"YDim\",\"XDim\")
\t\t\tEND_OBJECT=DataField_1
\t\tEND_GROUP=DataField
\t\tGROUP=MergedFields
\t\tEND_GROUP=MergedFields
\tEND_GROUP=GRID_1
END_GROUP=GridStructure
GROUP=PointStructure
END_GROUP=PointStructure
END
";

    /// AMSR-E daily sea ice on the 25 km EASE-Grids (two grids).
    pub const AMSR_E_EASE: &str = "GROUP=SwathStructure
END_GROUP=SwathStructure
GROUP=GridStructure
\tGROUP=GRID_1
\t\tGridName=\"Northern Hemisphere\"
\t\tXDim=721
\t\tYDim=721
\t\tUpperLeftPointMtrs=(-9036842.762500,9036842.762500)
\t\tLowerRightMtrs=(9036842.762500,-9036842.762500)
\t\tProjection=GCTP_LAMAZ
\t\tProjParams=(6371228,0,0,0,0,90000000,0,0,0,0,0,0,0)
\t\tSphereCode=-1
\t\tGridOrigin=HDFE_GD_UL
\tEND_GROUP=GRID_1
\tGROUP=GRID_2
\t\tGridName=\"Southern Hemisphere\"
\t\tXDim=721
\t\tYDim=721
\t\tUpperLeftPointMtrs=(-9036842.762500,9036842.762500)
\t\tLowerRightMtrs=(9036842.762500,-9036842.762500)
\t\tProjection=GCTP_LAMAZ
\t\tProjParams=(6371228,0,0,0,0,-90000000,0,0,0,0,0,0,0)
\t\tSphereCode=-1
\t\tGridOrigin=HDFE_GD_UL
\tEND_GROUP=GRID_2
END_GROUP=GridStructure
END
";

    /// 0.05° global climate modeling grid with packed-degree corners.
    pub const MODIS_CMG: &str = "GROUP=GridStructure
\tGROUP=GRID_1
\t\tGridName=\"MODIS_CMG_3MIN\"
\t\tXDim=7200
\t\tYDim=3600
\t\tUpperLeftPointMtrs=(-180000000.000000,90000000.000000)
\t\tLowerRightMtrs=(180000000.000000,-90000000.000000)
\t\tProjection=GCTP_GEO
\t\tGridOrigin=HDFE_GD_UL
\tEND_GROUP=GRID_1
END_GROUP=GridStructure
END
";

    /// Whole-globe 2 x 2 geographic grid.
    pub const GLOBAL_2X2: &str = "UpperLeftPointMtrs=(-180.0,90.0)\nLowerRightMtrs=(180.0,-90.0)\n";
}

/// Bounding boxes as (min_lon, min_lat, max_lon, max_lat).
pub mod bbox {
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);

    /// Two degrees square around (10°E, 20°N).
    pub const SMALL: (f64, f64, f64, f64) = (9.0, 19.0, 11.0, 21.0);

    /// A swath-sized box over the western United States.
    pub const WEST_US: (f64, f64, f64, f64) = (-125.0, 30.0, -110.0, 45.0);

    /// Straddles the antimeridian in [0, 360] longitudes.
    pub const PACIFIC_POSITIVE: (f64, f64, f64, f64) = (170.0, -10.0, 190.0, 10.0);
}

/// Values commonly used as fill codes.
pub mod fill {
    pub const INT16_FILL: i16 = -28672;
    pub const UINT16_FILL: u16 = 65535;
    pub const GENERIC_FILL: f64 = -9999.0;
}
