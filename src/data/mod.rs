//! Catalog data sources.

pub mod catalog {
    pub use crate::catalog::*;
}

pub mod product_store {
    pub use crate::product_store::*;
}

pub mod seed {
    pub use crate::seed::*;
}
