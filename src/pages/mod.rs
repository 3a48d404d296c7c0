// Values computed for the analytics pages from externally fetched snapshots

pub mod pair;

pub use pair::{PairOverview, PairSnapshot, TokenSnapshot, short_symbol};
