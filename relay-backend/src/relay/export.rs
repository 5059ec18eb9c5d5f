use crate::gateway::{GatewayError, GatewaySession};
use crate::models::MessageRecord;

/// Largest page the upstream API returns
pub const PAGE_SIZE: u8 = 100;

/// Walk a channel's history from newest to oldest, one page at a time.
///
/// Pages are requested strictly sequentially: each request asks for messages
/// older than the last message of the previous page, and the walk ends at the
/// first empty page. Results keep page order and the upstream order within a
/// page. Any failed page aborts the whole walk, as does a page that does not
/// move the cursor to older messages.
pub async fn fetch_full_history(
    session: &dyn GatewaySession,
    channel_id: &str,
) -> Result<Vec<MessageRecord>, GatewayError> {
    let mut history: Vec<MessageRecord> = Vec::new();
    let mut cursor: Option<u64> = None;
    let mut pages = 0usize;

    loop {
        let page = session
            .fetch_message_page(channel_id, cursor, PAGE_SIZE)
            .await?;
        pages += 1;

        let Some(oldest) = page.last().map(|m| m.id) else {
            break;
        };

        // The cursor must move to strictly older messages
        if let Some(previous) = cursor.filter(|previous| oldest >= *previous) {
            log::warn!(
                "Channel {}: page {} did not advance past message {}",
                channel_id,
                pages,
                previous
            );
            return Err(GatewayError::CursorStalled { cursor: previous });
        }

        log::debug!(
            "Channel {}: page {} returned {} messages",
            channel_id,
            pages,
            page.len()
        );
        history.extend(page);
        cursor = Some(oldest);
    }

    log::debug!(
        "Channel {}: exported {} messages in {} requests",
        channel_id,
        history.len(),
        pages
    );
    Ok(history)
}
