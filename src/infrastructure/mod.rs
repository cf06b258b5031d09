pub mod blockchain;
pub mod feed;
pub mod jupiter;
pub mod persistence;

#[cfg(test)]
pub(crate) mod testing;
