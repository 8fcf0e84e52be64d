// Serializable views of the relationship graph for export and persistence.

pub mod dto;
