pub(crate) mod analysis;
pub(crate) mod health;
pub(crate) mod news;
pub(crate) mod sentiment;
pub(crate) mod stocks;
