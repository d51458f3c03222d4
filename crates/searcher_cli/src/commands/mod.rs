pub(crate) mod list;
pub(crate) mod migrate;
pub(crate) mod output;
pub(crate) mod search;
pub(crate) mod serve;
