pub mod batch_resize_use_case;
pub mod domain;
pub mod infrastructure;
