//! Per-position letter index for subsequence walks.
//!
//! Every character position of a candidate gets a node, and every node (plus
//! the root) owns, for each case-folded character, the ordered list of *later*
//! positions holding that character. A query walk therefore only ever moves
//! forward through the text, and the head of each list is the leftmost
//! occurrence still available.

/// Number of slots in the case-folded ASCII alphabet.
pub const NUM_LETTERS: usize = 128;

/// Case-folded slot for an ASCII byte. Non-ASCII bytes have no slot.
#[inline]
pub fn index_for_char(c: u8) -> Option<usize> {
    if c.is_ascii() {
        Some(c.to_ascii_lowercase() as usize)
    } else {
        None
    }
}

/// Ordered occurrence lists keyed by case-folded character.
///
/// Identifiers use a handful of distinct characters, so a small vector with a
/// linear lookup beats a 128-slot table per node on memory.
#[derive(Debug, Clone, Default)]
pub struct LetterNodeListMap {
    entries: Vec<(u8, Vec<u32>)>,
}

impl LetterNodeListMap {
    /// Positions (ascending) of the given case-folded character.
    pub fn list_for_letter(&self, folded: u8) -> Option<&[u32]> {
        self.entries
            .iter()
            .find(|(letter, _)| *letter == folded)
            .map(|(_, positions)| positions.as_slice())
    }

    fn push(&mut self, folded: u8, position: u32) {
        match self.entries.iter_mut().find(|(letter, _)| *letter == folded) {
            Some((_, positions)) => positions.push(position),
            None => self.entries.push((folded, vec![position])),
        }
    }

    /// Lists are filled right to left; reversing turns the pushes into prepends
    /// so the earliest occurrence ends up at the head.
    fn finish(&mut self) {
        for (_, positions) in &mut self.entries {
            positions.reverse();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One character position of a candidate.
#[derive(Debug, Clone)]
pub struct LetterNode {
    letter: u8,
    is_uppercase: bool,
    index: u32,
    next: LetterNodeListMap,
}

impl LetterNode {
    /// Case-folded character at this position.
    pub fn letter(&self) -> u8 {
        self.letter
    }

    pub fn is_uppercase(&self) -> bool {
        self.is_uppercase
    }

    /// Position in the candidate text.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Occurrences after this position.
    pub fn next(&self) -> &LetterNodeListMap {
        &self.next
    }
}

/// Cursor in a walk: either the root (nothing consumed yet) or a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkPosition {
    Root,
    Node(usize),
}

/// Root plus one node per character of the candidate text.
#[derive(Debug, Clone, Default)]
pub struct LetterIndex {
    root: LetterNodeListMap,
    nodes: Vec<LetterNode>,
}

impl LetterIndex {
    /// Build the index for an ASCII text.
    ///
    /// Positions are visited from the end; each one is prepended to the root
    /// list and to the list of every earlier position, so the cost is
    /// quadratic in the text length. Candidates are short identifiers.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut nodes: Vec<LetterNode> = bytes
            .iter()
            .enumerate()
            .map(|(i, &c)| LetterNode {
                letter: c.to_ascii_lowercase(),
                is_uppercase: c.is_ascii_uppercase(),
                index: i as u32,
                next: LetterNodeListMap::default(),
            })
            .collect();
        let mut root = LetterNodeListMap::default();

        for i in (0..bytes.len()).rev() {
            let folded = nodes[i].letter;
            root.push(folded, i as u32);
            for earlier in nodes[..i].iter_mut() {
                earlier.next.push(folded, i as u32);
            }
        }

        root.finish();
        for node in &mut nodes {
            node.next.finish();
        }

        Self { root, nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<&LetterNode> {
        self.nodes.get(index)
    }

    /// Occurrence list reachable from `position` for a query byte, if any.
    pub fn nearest_for_letter(&self, position: WalkPosition, c: u8) -> Option<&[u32]> {
        let folded = index_for_char(c)? as u8;
        let map = match position {
            WalkPosition::Root => &self.root,
            WalkPosition::Node(i) => &self.nodes.get(i)?.next,
        };
        map.list_for_letter(folded)
    }

    /// First position in `candidates` whose character is uppercase.
    pub fn first_uppercase(&self, candidates: &[u32]) -> Option<usize> {
        candidates
            .iter()
            .map(|&p| p as usize)
            .find(|&p| self.nodes.get(p).is_some_and(|n| n.is_uppercase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_for_char_folds_case() {
        assert_eq!(index_for_char(b'a'), Some(b'a' as usize));
        assert_eq!(index_for_char(b'A'), Some(b'a' as usize));
        assert_eq!(index_for_char(b'_'), Some(b'_' as usize));
        assert_eq!(index_for_char(0xCE), None);
    }

    #[test]
    fn test_root_lists_every_occurrence_in_order() {
        let index = LetterIndex::new("abcab");
        assert_eq!(index.nearest_for_letter(WalkPosition::Root, b'a'), Some(&[0u32, 3][..]));
        assert_eq!(index.nearest_for_letter(WalkPosition::Root, b'b'), Some(&[1u32, 4][..]));
        assert_eq!(index.nearest_for_letter(WalkPosition::Root, b'c'), Some(&[2u32][..]));
        assert_eq!(index.nearest_for_letter(WalkPosition::Root, b'z'), None);
    }

    #[test]
    fn test_node_lists_only_later_positions() {
        let index = LetterIndex::new("abcab");
        assert_eq!(index.nearest_for_letter(WalkPosition::Node(0), b'a'), Some(&[3u32][..]));
        assert_eq!(index.nearest_for_letter(WalkPosition::Node(1), b'b'), Some(&[4u32][..]));
        assert_eq!(index.nearest_for_letter(WalkPosition::Node(3), b'a'), None);
        assert!(index.node(4).unwrap().next().is_empty());
    }

    #[test]
    fn test_lists_are_case_insensitive_with_flags() {
        let index = LetterIndex::new("fooBarbaz");
        let bs = index.nearest_for_letter(WalkPosition::Root, b'B').unwrap();
        assert_eq!(bs, &[3, 6]);
        assert_eq!(index.first_uppercase(bs), Some(3));
        let later = index.nearest_for_letter(WalkPosition::Node(3), b'b').unwrap();
        assert_eq!(later, &[6]);
        assert_eq!(index.first_uppercase(later), None);
    }

    #[test]
    fn test_empty_text_has_trivial_index() {
        let index = LetterIndex::new("");
        assert!(index.is_empty());
        assert_eq!(index.nearest_for_letter(WalkPosition::Root, b'a'), None);
    }
}
