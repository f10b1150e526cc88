//! Cross-cutting helpers shared by the services and the GraphQL layer.

pub mod db_errors;
