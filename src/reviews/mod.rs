// Review acquisition: typed review records and the sources that produce them.

pub mod file;
pub mod models;
pub mod traits;
