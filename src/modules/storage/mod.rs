//! S3/MinIO object storage for publicly served vendor images.

mod minio_client;
mod sigv4;

pub use minio_client::{sanitize_file_name, MinIOClient};
