//! Font statistics and heading font classification.

use std::collections::{BTreeMap, BTreeSet};

use super::FontStrategy;
use crate::model::{FontKey, TextBlock};

/// Occurrence counts of each font key across a document.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    counts: BTreeMap<FontKey, usize>,
}

impl FontStatistics {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally the font keys of all non-blank blocks with known fonts.
    pub fn collect<'a, I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a TextBlock>,
    {
        let mut stats = Self::new();
        for block in blocks {
            if !block.is_blank() {
                stats.add(block.font_key());
            }
        }
        stats
    }

    /// Add a font key observation. Unknown keys are ignored.
    pub fn add(&mut self, key: FontKey) {
        if key.is_known() {
            *self.counts.entry(key).or_insert(0) += 1;
        }
    }

    /// Number of occurrences of a key.
    pub fn count(&self, key: &FontKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// All counts, ordered by key.
    pub fn counts(&self) -> &BTreeMap<FontKey, usize> {
        &self.counts
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no known font was observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The most frequent key (body text). Ties go to the first key in order.
    pub fn body_key(&self) -> Option<&FontKey> {
        let mut best: Option<(&FontKey, usize)> = None;
        for (key, &count) in &self.counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((key, count));
            }
        }
        best.map(|(key, _)| key)
    }

    /// Distinct sizes (tenths of a point) with their total occurrence counts,
    /// in ascending size order.
    pub fn size_weights(&self) -> Vec<(i32, usize)> {
        let mut weights: BTreeMap<i32, usize> = BTreeMap::new();
        for (key, &count) in &self.counts {
            *weights.entry(key.size_tenths).or_insert(0) += count;
        }
        weights.into_iter().collect()
    }
}

/// The set of font keys judged to denote headings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingFonts {
    keys: BTreeSet<FontKey>,
    sizes_desc: Vec<i32>,
}

impl HeadingFonts {
    /// Build the set from classified keys.
    pub fn from_keys<I: IntoIterator<Item = FontKey>>(keys: I) -> Self {
        let keys: BTreeSet<FontKey> = keys.into_iter().collect();
        let mut sizes_desc: Vec<i32> = keys.iter().map(|k| k.size_tenths).collect();
        sizes_desc.sort_unstable_by(|a, b| b.cmp(a));
        sizes_desc.dedup();
        Self { keys, sizes_desc }
    }

    /// Check membership.
    pub fn contains(&self, key: &FontKey) -> bool {
        self.keys.contains(key)
    }

    /// Distinct heading sizes in tenths of a point, largest first.
    pub fn sizes_desc(&self) -> &[i32] {
        &self.sizes_desc
    }

    /// Iterate over the keys.
    pub fn iter(&self) -> impl Iterator<Item = &FontKey> {
        self.keys.iter()
    }

    /// Number of heading keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if there is no font signal.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Classify heading fonts with the selected strategy.
///
/// Degenerate input never fails: it yields an empty set and the analyzer
/// falls back to pattern evidence alone.
pub fn classify_heading_fonts(stats: &FontStatistics, strategy: &FontStrategy) -> HeadingFonts {
    if stats.is_empty() {
        return HeadingFonts::default();
    }
    let fonts = match *strategy {
        FontStrategy::Frequency { fraction } => by_frequency(stats, fraction),
        FontStrategy::SizeClustering { max_clusters } => by_size_clusters(stats, max_clusters),
    };
    log::debug!(
        "Heading fonts: {} of {} keys ({:?})",
        fonts.len(),
        stats.len(),
        strategy
    );
    fonts
}

fn by_frequency(stats: &FontStatistics, fraction: f32) -> HeadingFonts {
    let take = (stats.len() as f64 * fraction as f64 + 1e-6).floor() as usize;
    if take == 0 {
        return HeadingFonts::default();
    }

    let mut ranked: Vec<(&FontKey, usize)> =
        stats.counts().iter().map(|(k, c)| (k, *c)).collect();
    // Rarest first; among equally rare keys prefer the larger size
    ranked.sort_by(|a, b| {
        a.1.cmp(&b.1)
            .then(b.0.size_tenths.cmp(&a.0.size_tenths))
            .then(a.0.family.cmp(&b.0.family))
    });

    HeadingFonts::from_keys(ranked.into_iter().take(take).map(|(k, _)| k.clone()))
}

fn by_size_clusters(stats: &FontStatistics, max_clusters: usize) -> HeadingFonts {
    let sizes = stats.size_weights();
    if sizes.len() < 2 {
        return HeadingFonts::default();
    }

    let points: Vec<(f64, f64)> = sizes
        .iter()
        .map(|&(size, weight)| (size as f64, weight as f64))
        .collect();
    let k = max_clusters.min(points.len());
    let (assignment, centroids) = kmeans_1d(&points, k);

    let heading_cluster = match (0..k)
        .filter(|c| assignment.contains(c))
        .max_by(|a, b| centroids[*a].total_cmp(&centroids[*b]))
    {
        Some(cluster) => cluster,
        None => return HeadingFonts::default(),
    };

    let heading_sizes: BTreeSet<i32> = sizes
        .iter()
        .zip(&assignment)
        .filter(|(_, cluster)| **cluster == heading_cluster)
        .map(|(&(size, _), _)| size)
        .collect();

    // If body text falls in the largest cluster, sizes carry no heading signal
    if let Some(body) = stats.body_key() {
        if heading_sizes.contains(&body.size_tenths) {
            log::debug!("Body size {} is in the heading cluster; no font signal", body);
            return HeadingFonts::default();
        }
    }

    HeadingFonts::from_keys(
        stats
            .counts()
            .keys()
            .filter(|k| heading_sizes.contains(&k.size_tenths))
            .cloned(),
    )
}

/// Weighted 1-D k-means over `(value, weight)` points sorted by value.
///
/// Centroids start at evenly spaced points of the sorted input so the result
/// is deterministic. Returns the cluster index of each point and the centroids.
fn kmeans_1d(points: &[(f64, f64)], k: usize) -> (Vec<usize>, Vec<f64>) {
    const MAX_ITERATIONS: usize = 32;

    let n = points.len();
    let mut centroids: Vec<f64> = (0..k)
        .map(|i| {
            let idx = if k == 1 { 0 } else { i * (n - 1) / (k - 1) };
            points[idx].0
        })
        .collect();
    let mut assignment = vec![usize::MAX; n];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (i, &(value, _)) in points.iter().enumerate() {
            let nearest = centroids
                .iter()
                .enumerate()
                .min_by(|a, b| (a.1 - value).abs().total_cmp(&(b.1 - value).abs()))
                .map(|(c, _)| c)
                .unwrap_or(0);
            if assignment[i] != nearest {
                assignment[i] = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        for (c, centroid) in centroids.iter_mut().enumerate() {
            let (sum, weight) = points
                .iter()
                .zip(&assignment)
                .filter(|(_, a)| **a == c)
                .fold((0.0, 0.0), |(s, w), (&(v, pw), _)| (s + v * pw, w + pw));
            if weight > 0.0 {
                *centroid = sum / weight;
            }
        }
    }

    (assignment, centroids)
}
