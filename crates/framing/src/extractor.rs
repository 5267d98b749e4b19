//! Header-anchored candidate slicing.

use bytes::Bytes;
use contracts::HeaderPattern;
use metrics::counter;
use tracing::trace;

/// Slice fixed-length candidate frames out of a captured stream
///
/// With a non-empty header, every occurrence at offset `i` yields the
/// candidate `stream[i..i + frame_len]` when it fits. The search resumes
/// from `i + 1`, not `i + header.len()`: a header with a self-repeating
/// prefix must not hide later aligned occurrences, so this is "find all
/// starting positions", not "find all non-overlapping tiles".
///
/// Without a header, at most one candidate is emitted: `stream[0..frame_len]`
/// when the stream is long enough.
///
/// Candidates are zero-copy slices of `stream`, in ascending position order.
pub fn extract_frames(
    stream: &Bytes,
    header: Option<&HeaderPattern>,
    frame_len: usize,
) -> Vec<Bytes> {
    if frame_len == 0 {
        return Vec::new();
    }

    let frames = match header {
        Some(pattern) if !pattern.is_empty() => anchored_candidates(stream, pattern, frame_len),
        _ => unanchored_candidate(stream, frame_len),
    };

    counter!("framegrab_candidate_frames_total").increment(frames.len() as u64);
    trace!(candidates = frames.len(), stream_len = stream.len(), "extraction complete");
    frames
}

fn anchored_candidates(stream: &Bytes, pattern: &HeaderPattern, frame_len: usize) -> Vec<Bytes> {
    let needle = pattern.as_slice();
    let mut frames = Vec::new();
    let mut from = 0;

    while let Some(found) = find(&stream[from..], needle) {
        let at = from + found;
        let end = at + frame_len;
        if end <= stream.len() {
            frames.push(stream.slice(at..end));
        }
        from = at + 1;
    }
    frames
}

fn unanchored_candidate(stream: &Bytes, frame_len: usize) -> Vec<Bytes> {
    if stream.len() >= frame_len {
        vec![stream.slice(0..frame_len)]
    } else {
        Vec::new()
    }
}

/// First occurrence of `needle` in `haystack`
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(bytes: &[u8]) -> HeaderPattern {
        HeaderPattern::from(bytes)
    }

    #[test]
    fn test_all_occurrences_in_ascending_order() {
        // 00112233 at offsets 2 and 9; frame length 8 leaves only the first
        // fitting (9 + 8 > 15).
        let stream = Bytes::from_static(&[
            0xff, 0xff, 0x00, 0x11, 0x22, 0x33, 0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22, 0x33, 0xdd,
            0xee,
        ]);
        let pattern = header(&[0x00, 0x11, 0x22, 0x33]);

        let frames = extract_frames(&stream, Some(&pattern), 8);
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], &stream[2..10]);

        // Extend the stream so the second occurrence fits too
        let mut longer = stream.to_vec();
        longer.extend_from_slice(&[0x01, 0x02]);
        let longer = Bytes::from(longer);
        let frames = extract_frames(&longer, Some(&pattern), 8);
        assert_eq!(frames.len(), 2);
        assert_eq!(&frames[0][..], &longer[2..10]);
        assert_eq!(&frames[1][..], &longer[9..17]);
    }

    #[test]
    fn test_no_occurrence_yields_empty() {
        let stream = Bytes::from_static(&[0u8; 64]);
        let pattern = header(&[0xde, 0xad]);
        assert!(extract_frames(&stream, Some(&pattern), 8).is_empty());
    }

    #[test]
    fn test_headerless_single_candidate() {
        let stream = Bytes::from_static(b"0123456789");
        let frames = extract_frames(&stream, None, 4);
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], b"0123");

        // Too short: no candidate
        assert!(extract_frames(&stream, None, 11).is_empty());
        // Exact fit: one candidate
        assert_eq!(extract_frames(&stream, None, 10).len(), 1);
    }

    #[test]
    fn test_empty_header_behaves_as_headerless() {
        let stream = Bytes::from_static(b"abcdef");
        let empty = HeaderPattern::default();
        let frames = extract_frames(&stream, Some(&empty), 3);
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], b"abc");
    }

    #[test]
    fn test_zero_frame_len_yields_empty() {
        let stream = Bytes::from_static(b"abcdef");
        let pattern = header(b"ab");
        assert!(extract_frames(&stream, Some(&pattern), 0).is_empty());
    }

    #[test]
    fn test_self_repeating_header_overlapping_candidates() {
        // Header AA AA in AA AA AA 01 02: occurrences at 0 and 1 both yield
        // candidates; resuming at i+1 is deliberate.
        let stream = Bytes::from_static(&[0xaa, 0xaa, 0xaa, 0x01, 0x02]);
        let pattern = header(&[0xaa, 0xaa]);
        let frames = extract_frames(&stream, Some(&pattern), 4);
        assert_eq!(frames.len(), 2);
        assert_eq!(&frames[0][..], &[0xaa, 0xaa, 0xaa, 0x01]);
        assert_eq!(&frames[1][..], &[0xaa, 0xaa, 0x01, 0x02]);
    }

    #[test]
    fn test_trailing_truncated_occurrence_skipped() {
        let stream = Bytes::from_static(&[0x00, 0x11, 0x01, 0x00, 0x11]);
        let pattern = header(&[0x00, 0x11]);
        let frames = extract_frames(&stream, Some(&pattern), 3);
        // Occurrence at 3 cannot fit a 3-byte frame
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], &[0x00, 0x11, 0x01]);
    }
}
