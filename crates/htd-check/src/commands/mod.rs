pub mod batch;
pub mod check;
pub mod inspect;
pub mod normalize;
