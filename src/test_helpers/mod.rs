pub mod lookup;
pub mod objects;
