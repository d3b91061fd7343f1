//! # Probe Run
//!
//! One pass over a B2SHARE instance, strictly in order:
//!
//! 1. list the newest public records
//! 2. fetch one record and its schema
//! 3. fetch the record's file bucket and validate the metadata
//! 4. HEAD the first file
//!
//! All requests share one [`Deadline`]. The first error ends the run.

use std::io::Write;

use b2probe_client::{files_url, first_file_url, B2ShareClient, BucketShape, Deadline};
use b2probe_schema::record_schema_url;

use crate::args::{ProbeConfig, Verbosity};
use crate::metadata_check::{check_record_metadata, MetadataVerdict};
use crate::verdict::{Outcome, ProbeError, SEPARATOR};

/// Run the probe, writing progress lines to `out`.
///
/// The final status line is left to the caller.
pub async fn run_probe(config: &ProbeConfig, out: &mut dyn Write) -> Result<Outcome, ProbeError> {
    let deadline = Deadline::after(config.timeout);
    log_preamble(config);

    let client = B2ShareClient::new(&config.client)?;

    tracing::info!("Searching for records.");
    let hits = client.search_records(&deadline).await?;
    writeln!(out, "hits: {}", hits.total)?;

    if hits.total == 0 {
        tracing::info!("No search results returned by the query.");
        if config.error_if_no_records {
            return Err(ProbeError::NoRecords);
        }
        write_separator(config, out)?;
        return Ok(Outcome::NoRecords);
    }

    tracing::info!("Search returned some results.");
    let record_url = hits.record_url()?;
    tracing::info!("Fetching record {record_url}");
    let record = client.get_json(record_url, &deadline).await?;

    let schema_url = record_schema_url(&record)?;
    tracing::info!("Fetching metadata schema {schema_url}");
    let schema = client.get_json(schema_url, &deadline).await?;

    let bucket_url = files_url(&record)?;
    tracing::info!("Fetching file bucket {bucket_url}");
    let bucket = client.get_json(bucket_url, &deadline).await?;
    let shape = BucketShape::resolve(&bucket);
    tracing::info!("Detected B2SHARE API {}.", shape.api_version());

    let verdict = check_record_metadata(&record, schema_url, &schema, shape, &config.metadata, out)?;
    match verdict {
        MetadataVerdict::Valid => tracing::info!("Record metadata is valid."),
        MetadataVerdict::Tolerated => tracing::info!("Continuing despite metadata warnings."),
    }

    let file_url = first_file_url(&bucket, shape, bucket_url)?;
    tracing::info!("Checking that file {file_url} is accessible.");
    client.check_file(file_url, &deadline).await?;

    write_separator(config, out)?;
    Ok(Outcome::Healthy)
}

fn write_separator(config: &ProbeConfig, out: &mut dyn Write) -> std::io::Result<()> {
    if config.verbosity > Verbosity::None {
        writeln!(out, "{SEPARATOR}")?;
    }
    Ok(())
}

fn log_preamble(config: &ProbeConfig) {
    if !config.client.verify_tls {
        tracing::info!("TLS certificate verification: OFF");
    }
    tracing::info!("Verbosity level: {}", config.verbosity.level());
    tracing::info!("Timeout: {} seconds", config.timeout.as_secs());
    tracing::info!("B2SHARE URL: {}", config.client.base_url);
    tracing::info!("Starting B2SHARE Probe...");
    tracing::info!("{SEPARATOR}");
}
