pub use self::vector::*;

pub(crate) mod vector;
