//!
//! Route compilation and resolution.
//!
//! Route patterns are literal paths whose segments may be `<name>`
//! placeholders. At build time every pattern becomes an entry of the
//! [`RouteTable`] (exact lookup plus an anchored regex for parameterized
//! patterns) and a path in the [`RouteTree`]. Resolution tries exact, regex
//! and tree matching in that order.
//!
//! [`RouteEngine`] owns the built [`RouteSnapshot`] and is the usual entry
//! point.
//!
mod builder;
mod engine;
mod pattern;
mod registry;
mod resolver;
mod table;
mod tree;

pub use builder::*;
pub use engine::*;
pub use pattern::*;
pub use registry::*;
pub use resolver::*;
pub use table::*;
pub use tree::*;
