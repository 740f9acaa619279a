//! Huffman prefix coding over the characters of a text.
//!
//! The code tree is built with a min-priority heap. Every heap entry is keyed
//! by its frequency and then by the smallest symbol in its subtree, so equal
//! frequencies always merge in the same order and the resulting
//! [`CodeTable`] is reproducible for a given input.

use crate::error::{Error, RangeError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

/// Represents a node in the frequency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrequencyTree {
    /// A leaf node contains a symbol and its frequency.
    Leaf { symbol: char, freq: usize },
    /// An internal node with left and right children and combined frequency.
    Internal {
        freq: usize,
        left: Box<FrequencyTree>,
        right: Box<FrequencyTree>,
    },
}

impl FrequencyTree {
    /// Returns the frequency of the node.
    pub fn freq(&self) -> usize {
        match self {
            FrequencyTree::Leaf { freq, .. } => *freq,
            FrequencyTree::Internal { freq, .. } => *freq,
        }
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                FrequencyTree::Leaf { .. } => count += 1,
                FrequencyTree::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        count
    }
}

/// Heap entry ordered so that `BinaryHeap` pops the lowest frequency first,
/// falling back to the smallest symbol of the subtree on ties.
#[derive(Debug)]
struct HeapEntry {
    freq: usize,
    key: char,
    node: Box<FrequencyTree>,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.key.cmp(&self.key))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.key == other.key
    }
}

impl Eq for HeapEntry {}

/// Mapping from symbol to its prefix-free bit-string code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeTable {
    codes: BTreeMap<char, String>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the code for `symbol`, returning the previous code.
    pub fn insert(&mut self, symbol: char, code: impl Into<String>) -> Option<String> {
        self.codes.insert(symbol, code.into())
    }

    pub fn get(&self, symbol: char) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate over `(symbol, code)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code.as_str()))
    }

    /// Returns true if no code is a prefix of another.
    ///
    /// After sorting, a code that prefixes any other code also prefixes its
    /// immediate successor, so only neighbours need comparing.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&str> = self.codes.values().map(String::as_str).collect();
        codes.sort_unstable();
        codes.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }

    /// Invert the table for decoding, rejecting tables no decoder could use.
    fn reverse(&self) -> Result<HashMap<&str, char>> {
        let mut reverse = HashMap::with_capacity(self.codes.len());
        for (&symbol, code) in &self.codes {
            if code.is_empty() {
                return Err(Error::malformed(format!(
                    "empty code for symbol {symbol:?}"
                )));
            }
            if let Some(other) = reverse.insert(code.as_str(), symbol) {
                return Err(Error::malformed(format!(
                    "symbols {other:?} and {symbol:?} share the code {code:?}"
                )));
            }
        }
        Ok(reverse)
    }
}

impl FromIterator<(char, String)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (char, String)>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}

/// Build a frequency table mapping each character in `input` to its frequency.
pub fn build_frequency_table(input: &str) -> BTreeMap<char, usize> {
    let mut freq = BTreeMap::new();
    for ch in input.chars() {
        *freq.entry(ch).or_insert(0) += 1;
    }
    freq
}

/// Build the frequency tree for `text`.
/// Returns `None` if the text is empty.
pub fn build_tree(text: &str) -> Option<FrequencyTree> {
    let mut heap: BinaryHeap<HeapEntry> = build_frequency_table(text)
        .into_iter()
        .map(|(symbol, freq)| HeapEntry {
            freq,
            key: symbol,
            node: Box::new(FrequencyTree::Leaf { symbol, freq }),
        })
        .collect();

    // Combine nodes until only one tree remains.
    loop {
        let left = heap.pop()?;
        let Some(right) = heap.pop() else {
            return Some(*left.node);
        };
        let freq = left.freq + right.freq;
        heap.push(HeapEntry {
            freq,
            key: left.key.min(right.key),
            node: Box::new(FrequencyTree::Internal {
                freq,
                left: left.node,
                right: right.node,
            }),
        });
    }
}

/// Build the code table mapping symbols to their codes.
///
/// Walks the tree pre-order with an explicit stack, appending '0' for a left
/// branch and '1' for a right one. If the tree is a single leaf (one unique
/// symbol), the code "0" is assigned.
pub fn build_codes(tree: &FrequencyTree) -> CodeTable {
    let mut table = CodeTable::new();
    let mut stack = vec![(tree, String::new())];

    while let Some((node, prefix)) = stack.pop() {
        match node {
            FrequencyTree::Leaf { symbol, .. } => {
                let code = if prefix.is_empty() {
                    "0".to_string()
                } else {
                    prefix
                };
                table.insert(*symbol, code);
            }
            FrequencyTree::Internal { left, right, .. } => {
                let mut right_prefix = prefix.clone();
                right_prefix.push('1');
                stack.push((right, right_prefix));
                let mut left_prefix = prefix;
                left_prefix.push('0');
                stack.push((left, left_prefix));
            }
        }
    }
    table
}

/// Encode `text` against a supplied code table.
///
/// # Errors
///
/// `RangeError::MissingSymbol` if a character of `text` has no code.
pub fn encode_with(table: &CodeTable, text: &str) -> Result<String> {
    let mut encoded = String::new();
    for ch in text.chars() {
        let code = table.get(ch).ok_or(RangeError::MissingSymbol(ch))?;
        encoded.push_str(code);
    }
    Ok(encoded)
}

/// Builds the code table for `text` and encodes it.
///
/// Returns the table (needed later by [`decompress`]) and the bit-string.
/// Empty text gives an empty table and an empty bit-string.
pub fn compress(text: &str) -> Result<(CodeTable, String)> {
    let table = match build_tree(text) {
        Some(tree) => build_codes(&tree),
        None => CodeTable::new(),
    };
    let encoded = encode_with(&table, text)?;
    Ok((table, encoded))
}

/// Decode a bit-string produced with `table`.
///
/// Bits accumulate until they spell a code in the table; the matching symbol
/// is emitted and the accumulator resets.
///
/// # Errors
///
/// - `Error::MalformedInput` for a digit other than '0'/'1', or a table with
///   an empty or duplicated code
/// - `Error::DecodeAmbiguity` if bits are left over once the input ends
pub fn decompress(table: &CodeTable, bits: &str) -> Result<String> {
    let reverse = table.reverse()?;
    let mut decoded = String::new();
    let mut pending = String::new();
    let mut pending_start = 0;

    for (position, bit) in bits.chars().enumerate() {
        if bit != '0' && bit != '1' {
            return Err(Error::malformed(format!(
                "non-binary digit {bit:?} at position {position}"
            )));
        }
        if pending.is_empty() {
            pending_start = position;
        }
        pending.push(bit);
        if let Some(&symbol) = reverse.get(pending.as_str()) {
            decoded.push(symbol);
            pending.clear();
        }
    }

    if !pending.is_empty() {
        return Err(Error::DecodeAmbiguity {
            position: pending_start,
            trailing: pending,
        });
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_table() {
        let input = "aabccc";
        let freq = build_frequency_table(input);
        assert_eq!(freq.get(&'a'), Some(&2));
        assert_eq!(freq.get(&'b'), Some(&1));
        assert_eq!(freq.get(&'c'), Some(&3));
    }

    #[test]
    fn test_tree_and_code_table() {
        let input = "this is an example for huffman encoding";
        let tree = build_tree(input).expect("Tree should be built");
        assert_eq!(tree.freq(), input.chars().count());
        assert_eq!(tree.leaf_count(), build_frequency_table(input).len());

        let table = build_codes(&tree);
        for ch in input.chars() {
            assert!(table.get(ch).is_some(), "Missing code for '{}'", ch);
        }
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_ties_break_by_symbol() {
        let (table, _) = compress("dcba").unwrap();
        assert_eq!(table.get('a'), Some("00"));
        assert_eq!(table.get('b'), Some("01"));
        assert_eq!(table.get('c'), Some("10"));
        assert_eq!(table.get('d'), Some("11"));

        // b (1) merges with a (2); that subtree is keyed by 'a' and wins the
        // tie against c (3).
        let (table, _) = compress("aabccc").unwrap();
        assert_eq!(table.get('b'), Some("00"));
        assert_eq!(table.get('a'), Some("01"));
        assert_eq!(table.get('c'), Some("1"));
    }

    #[test]
    fn test_codes_independent_of_input_order() {
        let (first, _) = compress("the quick brown fox").unwrap();
        let (second, _) = compress("xof nworb kciuq eht").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_aaab() {
        let (table, bits) = compress("AAAB").unwrap();
        let a = table.get('A').unwrap();
        let b = table.get('B').unwrap();
        assert_eq!(a.len(), 1);
        assert_ne!(a, b);
        assert_eq!(bits.len(), 4);
        assert_eq!(decompress(&table, &bits).unwrap(), "AAAB");
    }

    #[test]
    fn test_encode_decode() {
        for input in [
            "huffman coding in rust is fun!",
            "HELLO HELLO DNA",
            "Test DNA Storage Benchmark. HELLO DNA!",
            "caf\u{e9} \u{ff}\u{0}\u{7f}",
        ] {
            let (table, bits) = compress(input).unwrap();
            assert!(bits.chars().all(|b| b == '0' || b == '1'));
            assert_eq!(decompress(&table, &bits).unwrap(), input);
        }
    }

    #[test]
    fn test_single_character() {
        let input = "aaaaaaa";
        let (table, bits) = compress(input).unwrap();
        // With a single symbol, the assigned code is "0" for each occurrence.
        assert_eq!(table.get('a'), Some("0"));
        assert_eq!(bits, "0".repeat(input.len()));
        assert_eq!(decompress(&table, &bits).unwrap(), input);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree("").is_none());
        let (table, bits) = compress("").unwrap();
        assert!(table.is_empty());
        assert!(bits.is_empty());
        assert_eq!(decompress(&table, "").unwrap(), "");
    }

    #[test]
    fn test_deep_tree() {
        // Fibonacci frequencies give a maximally skewed tree.
        let mut input = String::new();
        let (mut a, mut b) = (1usize, 1usize);
        for ch in 'a'..='t' {
            input.extend(std::iter::repeat(ch).take(a));
            (a, b) = (b, a + b);
        }
        let (table, bits) = compress(&input).unwrap();
        let longest = table.iter().map(|(_, code)| code.len()).max().unwrap();
        assert_eq!(longest, 19);
        assert_eq!(decompress(&table, &bits).unwrap(), input);
    }

    #[test]
    fn test_trailing_bits_rejected() {
        let (table, _) = compress("abcd").unwrap();
        match decompress(&table, "001") {
            Err(Error::DecodeAmbiguity { position, trailing }) => {
                assert_eq!(position, 2);
                assert_eq!(trailing, "1");
            }
            other => panic!("expected DecodeAmbiguity, got {:?}", other),
        }

        // Nothing in an empty table can match.
        assert!(matches!(
            decompress(&CodeTable::new(), "0"),
            Err(Error::DecodeAmbiguity { .. })
        ));
    }

    #[test]
    fn test_non_binary_digit_rejected() {
        let (table, _) = compress("abcd").unwrap();
        assert!(matches!(
            decompress(&table, "00x1"),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_foreign_table() {
        let table: CodeTable = [('x', "0".to_string()), ('y', "10".to_string())]
            .into_iter()
            .collect();
        assert_eq!(encode_with(&table, "xyx").unwrap(), "0100");
        assert_eq!(decompress(&table, "0100").unwrap(), "xyx");

        match encode_with(&table, "xyz") {
            Err(Error::Range(RangeError::MissingSymbol(ch))) => assert_eq!(ch, 'z'),
            other => panic!("expected MissingSymbol, got {:?}", other),
        }
    }

    #[test]
    fn test_unusable_tables_rejected() {
        let shared: CodeTable = [('x', "01".to_string()), ('y', "01".to_string())]
            .into_iter()
            .collect();
        assert!(matches!(
            decompress(&shared, "01"),
            Err(Error::MalformedInput(_))
        ));

        let mut empty_code = CodeTable::new();
        empty_code.insert('x', "");
        assert!(matches!(
            decompress(&empty_code, "0"),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_prefix_free_check() {
        let mut table = CodeTable::new();
        table.insert('a', "0");
        table.insert('b', "10");
        table.insert('c', "11");
        assert!(table.is_prefix_free());
        table.insert('d', "1");
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn test_code_table_serde_roundtrip() {
        let text = "say \"hi\" \\ \u{0}\u{ff}\u{ff}";
        let (table, bits) = compress(text).unwrap();

        let json = serde_json::to_string(&table).unwrap();
        let restored: CodeTable = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, table);
        assert_eq!(decompress(&restored, &bits).unwrap(), text);
    }
}
