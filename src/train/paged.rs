use std::path::Path;

use log::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::train::epoch;
use crate::train::page::PageReader;
use crate::train::scratch::ScratchBuffer;

/// Number of epoch-loss debug lines emitted over a full run.
const LOG_POINTS: usize = 10;

// ---------------------------------------------------------------------------
// Public entry point (via Network::train_batch_in)
// ---------------------------------------------------------------------------

/// Ingests every page from `reader` into a scratch buffer under
/// `scratch_dir`, then replays the buffer `network.epochs()` times.
///
/// The scratch buffer is owned by this call. Any early return drops it, which
/// deletes both backing files; the success path closes them explicitly.
pub(crate) fn train_paged<R: PageReader + ?Sized>(
    network: &mut Network,
    scratch_dir: &Path,
    total_records: usize,
    reader: &mut R,
    page_size: usize,
) -> Result<f64> {
    if total_records == 0 {
        return Err(Error::bad_param("total records is empty"));
    }
    if page_size == 0 {
        return Err(Error::bad_param("page size must be at least 1"));
    }

    let total_pages = total_records.div_ceil(page_size);
    let epochs = network.epochs();
    info!(
        "paged training: {total_records} records in {total_pages} pages of up to {page_size}, {epochs} epochs"
    );

    // ── Ingest ─────────────────────────────────────────────────────────────
    let mut scratch = ScratchBuffer::create(
        scratch_dir,
        network.total_input_neurons(),
        network.total_output_neurons(),
    )?;
    let mut page_counts = Vec::with_capacity(total_pages);

    for page in 0..total_pages {
        let data = reader.read_page(page, page_size).ok_or_else(|| {
            Error::bad_param(format!(
                "page reader ran out of data at page {page} of {total_pages}"
            ))
        })?;
        network
            .check_rows(&data.inputs, &data.outputs, Some(page_size))
            .map_err(|e| match e {
                Error::BadNetworkParameter(msg) => {
                    Error::BadNetworkParameter(format!("page {page}: {msg}"))
                }
                other => other,
            })?;
        scratch.append(&data)?;
        page_counts.push(data.len());
        debug!("ingested page {page} ({} records)", data.len());
    }

    // ── Replay ─────────────────────────────────────────────────────────────
    let mut replay = scratch.into_replay()?;
    let records: usize = page_counts.iter().sum();
    let log_every = (epochs / LOG_POINTS).max(1);
    let mut last_loss = 0.0;

    for epoch_index in 1..=epochs {
        replay.rewind()?;
        let mut weighted_loss = 0.0;
        for (page, &count) in page_counts.iter().enumerate() {
            let (inputs, outputs) = replay.read_page(count)?;
            weighted_loss += epoch::run_epoch(network, &inputs, &outputs) * count as f64;
            trace!("epoch {epoch_index}: replayed page {page}");
        }
        last_loss = weighted_loss / records as f64;

        if epoch_index % log_every == 0 || epoch_index == epochs {
            debug!("epoch {epoch_index}/{epochs}: loss = {last_loss:.6}");
        }
    }

    if let Err(e) = replay.close() {
        warn!("could not remove scratch files: {e}");
    }
    info!("paged training finished, loss = {last_loss:.6}");
    Ok(last_loss)
}
