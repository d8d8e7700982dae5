// Domain-layer modules and shared errors/models
pub mod badges {
    pub use crate::badges::*;
}

pub mod scoring {
    pub use crate::scoring::*;
}

pub mod responder {
    pub use crate::responder::*;
}

pub mod assistant {
    pub use crate::assistant::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
