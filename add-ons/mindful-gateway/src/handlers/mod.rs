pub(crate) mod chat;
pub(crate) mod journal;
pub(crate) mod status;
