pub mod create_comment_builder;
pub mod upsert_file_builder;
