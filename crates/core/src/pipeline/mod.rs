pub mod crop_stage;
pub mod extract_crops_use_case;
pub mod infrastructure;
pub mod output_writer;
pub mod pipeline_executor;
pub mod pipeline_logger;
