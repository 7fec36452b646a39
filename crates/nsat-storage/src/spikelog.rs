//! Engine spike-log format
//!
//! A spike log is a flat stream of 4-byte integers: a fixed five-word header
//! followed by a body of `(time, neuron_id)` pairs.
//!
//! ```text
//! | h0 | h1 | h2 | h3 | h4 | t0 | n0 | t1 | n1 | ...
//! |<----- 20 bytes ------>|<---- 8 bytes per spike ---->
//! ```
//!
//! The header is carried through untouched. The word width is fixed at four
//! bytes regardless of the host, and byte order is an explicit parameter.

use crate::{
    error::{Result, StorageError},
    schemas::{read_i32_words, ByteOrder, WORD_SIZE},
    Spike,
};

use std::path::Path;

/// Number of words in the spike-log header
pub const HEADER_WORDS: usize = 5;

/// Size of the spike-log header in bytes
pub const HEADER_SIZE: usize = HEADER_WORDS * WORD_SIZE;

/// Raw spike-log header words
pub type SpikeLogHeader = [i32; HEADER_WORDS];

/// Decode a little-endian spike log into header and body words
pub fn decode(buffer: &[u8]) -> Result<(SpikeLogHeader, Vec<i32>)> {
    decode_with(buffer, ByteOrder::Little)
}

/// Decode a spike log with an explicit byte order
pub fn decode_with(buffer: &[u8], order: ByteOrder) -> Result<(SpikeLogHeader, Vec<i32>)> {
    if buffer.len() < HEADER_SIZE {
        return Err(StorageError::invalid_format(format!(
            "spike log too short for header: need {} bytes, got {}",
            HEADER_SIZE,
            buffer.len()
        )));
    }

    let (head, rest) = buffer.split_at(HEADER_SIZE);
    if rest.len() % WORD_SIZE != 0 {
        return Err(StorageError::invalid_format(format!(
            "spike log body of {} bytes is not a multiple of {}",
            rest.len(),
            WORD_SIZE
        )));
    }

    let body = read_i32_words(rest, order)?;
    if body.len() % 2 != 0 {
        return Err(StorageError::invalid_format(format!(
            "spike log body has odd word count {}",
            body.len()
        )));
    }

    let mut header = [0i32; HEADER_WORDS];
    for (slot, word) in header.iter_mut().zip(read_i32_words(head, order)?) {
        *slot = word;
    }

    log::debug!("decoded spike log: {} bytes, {} spikes", buffer.len(), body.len() / 2);
    Ok((header, body))
}

/// Split alternating body words into spike times and neuron ids
pub fn extract_time_and_ids(body: &[i32]) -> Result<(Vec<i32>, Vec<i32>)> {
    if body.len() % 2 != 0 {
        return Err(StorageError::invalid_format(format!(
            "cannot pair {} body words into (time, neuron) records",
            body.len()
        )));
    }

    Ok(body.chunks_exact(2).map(|pair| (pair[0], pair[1])).unzip())
}

/// Encode header and body words into the spike-log layout
pub fn encode(header: &SpikeLogHeader, body: &[i32], order: ByteOrder) -> Result<Vec<u8>> {
    if body.len() % 2 != 0 {
        return Err(StorageError::invalid_format(format!(
            "refusing to encode odd body word count {}",
            body.len()
        )));
    }

    let mut bytes = Vec::with_capacity(HEADER_SIZE + body.len() * WORD_SIZE);
    for &word in header.iter().chain(body) {
        bytes.extend_from_slice(&order.i32_bytes(word));
    }
    Ok(bytes)
}

/// Raster coordinates ready for an `(x, y)` scatter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raster {
    /// Spike times (x axis)
    pub times: Vec<i32>,
    /// Neuron ids (y axis), same length as `times`
    pub neuron_ids: Vec<i32>,
}

impl Raster {
    /// Number of spikes
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when there are no spikes
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Smallest and largest spike time
    pub fn time_range(&self) -> Option<(i32, i32)> {
        min_max(&self.times)
    }

    /// Smallest and largest neuron id
    pub fn neuron_range(&self) -> Option<(i32, i32)> {
        min_max(&self.neuron_ids)
    }

    /// Iterate over the raster as spikes
    pub fn spikes(&self) -> impl Iterator<Item = Spike> + '_ {
        self.times
            .iter()
            .zip(&self.neuron_ids)
            .map(|(&time, &neuron_id)| Spike::new(time, neuron_id))
    }
}

fn min_max(values: &[i32]) -> Option<(i32, i32)> {
    let min = values.iter().copied().min()?;
    let max = values.iter().copied().max()?;
    Some((min, max))
}

/// A decoded spike log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpikeLog {
    /// Header words, not interpreted
    pub header: SpikeLogHeader,
    /// Body words, alternating time step and neuron id
    pub body: Vec<i32>,
}

impl SpikeLog {
    /// Decode a spike log held in memory
    pub fn from_bytes(buffer: &[u8], order: ByteOrder) -> Result<Self> {
        let (header, body) = decode_with(buffer, order)?;
        Ok(Self { header, body })
    }

    /// Read and decode a whole spike-log file
    pub fn read<P: AsRef<Path>>(path: P, order: ByteOrder) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        log::debug!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes, order)
    }

    /// Encode back into the binary layout
    pub fn to_bytes(&self, order: ByteOrder) -> Result<Vec<u8>> {
        encode(&self.header, &self.body, order)
    }

    /// Number of spikes in the body
    pub fn spike_count(&self) -> usize {
        self.body.len() / 2
    }

    /// Raster coordinates of every spike
    pub fn raster(&self) -> Raster {
        // The body length is checked on construction.
        let (times, neuron_ids) = self.body.chunks_exact(2).map(|p| (p[0], p[1])).unzip();
        Raster { times, neuron_ids }
    }

    /// Iterate over the spikes in file order
    pub fn spikes(&self) -> impl Iterator<Item = Spike> + '_ {
        self.body.chunks_exact(2).map(|p| Spike::new(p[0], p[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn words(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_decode_example() {
        let buffer = words(&[1, 2, 3, 4, 5, 10, 3, 12, 7]);
        let (header, body) = decode(&buffer).unwrap();
        assert_eq!(header, [1, 2, 3, 4, 5]);
        assert_eq!(body, vec![10, 3, 12, 7]);

        let (times, ids) = extract_time_and_ids(&body).unwrap();
        assert_eq!(times, vec![10, 12]);
        assert_eq!(ids, vec![3, 7]);
    }

    #[test]
    fn test_decode_header_only() {
        let (header, body) = decode(&words(&[9, 8, 7, 6, 5])).unwrap();
        assert_eq!(header, [9, 8, 7, 6, 5]);
        assert!(body.is_empty());
    }

    #[test]
    fn test_decode_short_buffer() {
        let err = decode(&[0u8; 19]).unwrap_err();
        assert!(err.is_format_error());
        assert!(decode(&[]).unwrap_err().is_format_error());
    }

    #[test]
    fn test_decode_odd_body() {
        let err = decode(&words(&[1, 2, 3, 4, 5, 10, 3, 12])).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("odd"));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut buffer = words(&[1, 2, 3, 4, 5, 10, 3]);
        buffer.push(0);
        assert!(decode(&buffer).unwrap_err().is_format_error());
    }

    #[test]
    fn test_decode_is_deterministic_on_failure() {
        let buffer = words(&[1, 2, 3, 4, 5, 10]);
        let first = decode(&buffer).unwrap_err().to_string();
        let second = decode(&buffer).unwrap_err().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_big_endian() {
        let buffer: Vec<u8> = [1i32, 2, 3, 4, 5, 100, 42, 7, 8]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        let (header, body) = decode_with(&buffer, ByteOrder::Big).unwrap();
        assert_eq!(header, [1, 2, 3, 4, 5]);
        assert_eq!(body, vec![100, 42, 7, 8]);

        // Same bytes read with the wrong order give different words.
        let (_, swapped) = decode(&buffer).unwrap();
        assert_ne!(swapped, body);
    }

    #[test]
    fn test_extract_odd_body() {
        assert!(extract_time_and_ids(&[1, 2, 3]).unwrap_err().is_format_error());
        let (t, n) = extract_time_and_ids(&[]).unwrap();
        assert!(t.is_empty() && n.is_empty());
    }

    #[test]
    fn test_encode_roundtrip() {
        let header = [1, 2, 3, 4, 5];
        let body = vec![0, 1, 5, -2, 9, 40];
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let bytes = encode(&header, &body, order).unwrap();
            assert_eq!(bytes.len(), HEADER_SIZE + body.len() * WORD_SIZE);
            let log = SpikeLog::from_bytes(&bytes, order).unwrap();
            assert_eq!(log.header, header);
            assert_eq!(log.body, body);
        }
        assert!(encode(&header, &[1], ByteOrder::Little).is_err());
    }

    #[test]
    fn test_spike_log_raster() {
        let log = SpikeLog::from_bytes(&words(&[0, 0, 0, 0, 0, 4, 1, 2, 9, 7, 3]), ByteOrder::Little)
            .unwrap();
        assert_eq!(log.spike_count(), 3);

        let raster = log.raster();
        assert_eq!(raster.times, vec![4, 2, 7]);
        assert_eq!(raster.neuron_ids, vec![1, 9, 3]);
        assert_eq!(raster.time_range(), Some((2, 7)));
        assert_eq!(raster.neuron_range(), Some((1, 9)));

        let spikes: Vec<_> = log.spikes().collect();
        assert_eq!(spikes[1], Spike::new(2, 9));
        assert_eq!(raster.spikes().collect::<Vec<_>>(), spikes);
    }

    #[test]
    fn test_empty_raster() {
        let raster = Raster::default();
        assert!(raster.is_empty());
        assert_eq!(raster.time_range(), None);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SpikeLog::read(dir.path().join("missing.dat"), ByteOrder::Little).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exc.dat");
        std::fs::write(&path, words(&[1, 2, 3, 4, 5, 10, 3, 12, 7])).unwrap();
        let log = SpikeLog::read(&path, ByteOrder::Little).unwrap();
        assert_eq!(log.spike_count(), 2);
    }

    proptest! {
        #[test]
        fn prop_valid_buffers_decode(
            header in prop::array::uniform5(any::<i32>()),
            pairs in prop::collection::vec((any::<i32>(), any::<i32>()), 0..64),
        ) {
            let body: Vec<i32> = pairs.iter().flat_map(|&(t, n)| [t, n]).collect();
            let mut raw = words(&header);
            raw.extend(words(&body));

            let (h, b) = decode(&raw).unwrap();
            prop_assert_eq!(h.len(), HEADER_WORDS);
            prop_assert_eq!(b.len() % 2, 0);
            prop_assert_eq!(&b, &body);
        }

        #[test]
        fn prop_extract_pairs(
            pairs in prop::collection::vec((any::<i32>(), any::<i32>()), 0..64),
        ) {
            let body: Vec<i32> = pairs.iter().flat_map(|&(t, n)| [t, n]).collect();
            let (times, ids) = extract_time_and_ids(&body).unwrap();
            prop_assert_eq!(times.len(), body.len() / 2);
            prop_assert_eq!(ids.len(), body.len() / 2);
            for k in 0..times.len() {
                prop_assert_eq!(times[k], body[2 * k]);
                prop_assert_eq!(ids[k], body[2 * k + 1]);
            }
        }

        #[test]
        fn prop_short_buffers_fail(len in 0usize..HEADER_SIZE) {
            let raw = vec![0u8; len];
            prop_assert!(decode(&raw).unwrap_err().is_format_error());
        }

        #[test]
        fn prop_odd_bodies_fail(
            body in prop::collection::vec(any::<i32>(), 0..63).prop_map(|mut v| {
                if v.len() % 2 == 0 {
                    v.push(0);
                }
                v
            }),
        ) {
            let mut raw = words(&[0; HEADER_WORDS]);
            raw.extend(words(&body));
            prop_assert!(decode(&raw).unwrap_err().is_format_error());
        }
    }
}
