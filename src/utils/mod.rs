pub(crate) mod logging;
