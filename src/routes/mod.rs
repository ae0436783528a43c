pub(crate) mod analysis;
pub(crate) mod health;
