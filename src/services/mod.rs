pub mod auto_apply;
pub mod file_service;
pub mod oracle;
pub mod organize_service;
pub mod queue_service;
