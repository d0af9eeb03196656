//! Flutter bridge surface for the JobTrakr core store.

pub mod api;
