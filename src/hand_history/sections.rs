//! Partitioning a raw hand history into its street segments.

/// The six literal markers, in the order they appear in a transcript.
pub const MARKERS: [&str; 6] = [
    "*** HOLE CARDS ***",
    "*** FLOP ***",
    "*** TURN ***",
    "*** RIVER ***",
    "*** SHOW DOWN ***",
    "*** SUMMARY ***",
];

/// A hand history partitioned on the fixed section markers.
///
/// The caption is everything before `*** HOLE CARDS ***`. Each later segment
/// is the text between its marker and the next present marker, with the
/// marker literal itself stripped. `None` means the marker never appeared
/// (the hand ended before that street); downstream extraction treats an
/// absent segment as empty text and produces the field's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    pub caption: String,
    pub preflop: Option<String>,
    pub flop: Option<String>,
    pub turn: Option<String>,
    pub river: Option<String>,
    pub showdown: Option<String>,
    pub summary: Option<String>,
}

impl Sections {
    /// Split raw hand text on the markers, scanning left to right.
    ///
    /// Markers are matched in order; a marker that appears out of order is
    /// treated as absent, like any other missing street.
    pub fn split(text: &str) -> Sections {
        // Byte range of each segment body, if its marker is present.
        let mut bodies: [Option<usize>; 6] = [None; 6];
        let mut cursor = 0;
        for (i, marker) in MARKERS.iter().enumerate() {
            if let Some(pos) = text[cursor..].find(marker) {
                cursor += pos + marker.len();
                bodies[i] = Some(cursor);
            }
        }

        let caption_end = bodies
            .iter()
            .flatten()
            .next()
            .map(|&start| start - MARKERS[first_present(&bodies)].len())
            .unwrap_or(text.len());

        let mut segments: [Option<String>; 6] = Default::default();
        for i in 0..6 {
            if let Some(start) = bodies[i] {
                // Segment runs until the next present marker.
                let end = bodies[i + 1..]
                    .iter()
                    .flatten()
                    .next()
                    .map(|&next_start| next_start - marker_before(&bodies, next_start))
                    .unwrap_or(text.len());
                segments[i] = Some(text[start..end].to_string());
            }
        }

        let [preflop, flop, turn, river, showdown, summary] = segments;
        Sections {
            caption: text[..caption_end].to_string(),
            preflop,
            flop,
            turn,
            river,
            showdown,
            summary,
        }
    }

    /// Reassemble the original text: caption, then each present marker
    /// followed by its segment. This is the exact inverse of [`split`] for
    /// any text whose markers appear in order.
    ///
    /// [`split`]: Sections::split
    pub fn reassemble(&self) -> String {
        let mut out = self.caption.clone();
        let parts = [
            &self.preflop,
            &self.flop,
            &self.turn,
            &self.river,
            &self.showdown,
            &self.summary,
        ];
        for (marker, segment) in MARKERS.iter().zip(parts) {
            if let Some(segment) = segment {
                out.push_str(marker);
                out.push_str(segment);
            }
        }
        out
    }

    pub fn preflop(&self) -> &str {
        self.preflop.as_deref().unwrap_or("")
    }

    pub fn flop(&self) -> &str {
        self.flop.as_deref().unwrap_or("")
    }

    pub fn turn(&self) -> &str {
        self.turn.as_deref().unwrap_or("")
    }

    pub fn river(&self) -> &str {
        self.river.as_deref().unwrap_or("")
    }

    pub fn showdown(&self) -> &str {
        self.showdown.as_deref().unwrap_or("")
    }

    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }
}

fn first_present(bodies: &[Option<usize>; 6]) -> usize {
    bodies.iter().position(|b| b.is_some()).unwrap_or(0)
}

/// Length of the marker whose body starts at `body_start`.
fn marker_before(bodies: &[Option<usize>; 6], body_start: usize) -> usize {
    for (i, body) in bodies.iter().enumerate() {
        if *body == Some(body_start) {
            return MARKERS[i].len();
        }
    }
    0
}
