//! Fractal tree geometry
//!
//! Expands a creature's tree genes into line segments. Generation is
//! independent of any canvas: segments go to a sink in depth-first
//! pre-order (parent first, then children left to right).

use biomorph_creature::{Creature, GeneError, GeneRng, tree_genes};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A straight line between two canvas points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: DVec2,
    pub end: DVec2,
}

impl LineSegment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// How many children each branch point spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanOut {
    /// Exactly `num_branches` children
    #[default]
    Exact,
    /// `num_branches + 1` children
    PlusOne,
}

impl FanOut {
    pub fn children(&self, num_branches: usize) -> usize {
        match self {
            FanOut::Exact => num_branches,
            FanOut::PlusOne => num_branches + 1,
        }
    }
}

/// Tree genes resolved to concrete drawing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    /// Length of the trunk segment
    pub branch_length: f64,
    /// Recursion depth (number of branching levels)
    pub num_gens: usize,
    /// Spread of the first fan of children, in radians
    pub branch_angle: f64,
    /// Per-level length multiplier
    pub branch_increase: f64,
    /// Per-level spread multiplier
    pub angle_increase: f64,
    pub num_branches: usize,
    pub angle_noise: f64,
    pub length_noise: f64,
}

impl TreeParams {
    /// Read tree genes from a creature
    ///
    /// Integer genes are truncated (4.5 generations draw 4 levels) and capped
    /// at their schema maximum, so restored out-of-range creatures still draw
    /// a bounded tree. The noise genes are optional and default to zero.
    pub fn from_creature(creature: &Creature) -> Result<Self, GeneError> {
        let optional = |name: &str| match creature.get_value(name) {
            Ok(value) => Ok(value),
            Err(GeneError::NotFound { .. }) => Ok(0.0),
            Err(e) => Err(e),
        };
        let count = |name: &str| -> Result<usize, GeneError> {
            let gene = creature.gene_value(name)?;
            Ok(to_count(gene.value).min(to_count(gene.definition.range.max)))
        };

        Ok(Self {
            branch_length: creature.get_value(tree_genes::BRANCH_LENGTH)?,
            num_gens: count(tree_genes::NUM_GENS)?,
            branch_angle: creature.get_value(tree_genes::BRANCH_ANGLE)?,
            branch_increase: creature.get_value(tree_genes::BRANCH_INCREASE)?,
            angle_increase: creature.get_value(tree_genes::ANGLE_INCREASE)?,
            num_branches: count(tree_genes::NUM_BRANCHES)?,
            angle_noise: optional(tree_genes::ANGLE_NOISE)?,
            length_noise: optional(tree_genes::LENGTH_NOISE)?,
        })
    }

    /// Number of segments a noiseless tree emits
    pub fn segment_count(&self, fan_out: FanOut) -> usize {
        let k = fan_out.children(self.num_branches);
        let mut total = 0usize;
        let mut level = 1usize;
        for _ in 0..self.num_gens {
            total = total.saturating_add(level);
            level = level.saturating_mul(k);
        }
        total
    }
}

/// Truncate a gene value to a count; negative and NaN values become zero
fn to_count(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value as usize
    } else {
        0
    }
}

/// Recursion state for one branch
#[derive(Debug, Clone, Copy)]
struct Branch {
    generations: usize,
    heading: f64,
    origin: DVec2,
    length: f64,
    spread: f64,
}

/// Per-node perturbation of spread and length
trait Jitter {
    fn perturb(&mut self, params: &TreeParams, spread: f64, length: f64) -> (f64, f64);
}

struct NoJitter;

impl Jitter for NoJitter {
    fn perturb(&mut self, _params: &TreeParams, spread: f64, length: f64) -> (f64, f64) {
        (spread, length)
    }
}

/// One-sided exponential noise: branches only ever grow wider or longer
struct ExpJitter<'a, R: GeneRng + ?Sized>(&'a mut R);

impl<R: GeneRng + ?Sized> Jitter for ExpJitter<'_, R> {
    fn perturb(&mut self, params: &TreeParams, spread: f64, length: f64) -> (f64, f64) {
        let spread = spread * (1.0 + params.angle_noise.abs() * self.0.gen_exp());
        let length = length * (1.0 + params.length_noise.abs() * self.0.gen_exp());
        (spread, length)
    }
}

fn grow<J: Jitter, F: FnMut(LineSegment)>(
    params: &TreeParams,
    fan_out: FanOut,
    branch: Branch,
    jitter: &mut J,
    sink: &mut F,
) {
    if branch.generations == 0 {
        return;
    }

    let (spread, length) = jitter.perturb(params, branch.spread, branch.length);

    // Heading 0 points up; canvas y grows downward
    let tip = branch.origin + length * DVec2::new(-branch.heading.sin(), -branch.heading.cos());
    sink(LineSegment::new(branch.origin, tip));

    let k = fan_out.children(params.num_branches);
    for i in 0..k {
        let heading = if k > 1 {
            branch.heading - spread / 2.0 + spread * i as f64 / (k - 1) as f64
        } else {
            branch.heading
        };

        grow(
            params,
            fan_out,
            Branch {
                generations: branch.generations - 1,
                heading,
                origin: tip,
                length: branch.length * params.branch_increase,
                spread: branch.spread * params.angle_increase,
            },
            jitter,
            sink,
        );
    }
}

fn root(params: &TreeParams, origin: DVec2) -> Branch {
    Branch {
        generations: params.num_gens,
        heading: 0.0,
        origin,
        length: params.branch_length,
        spread: params.branch_angle,
    }
}

/// Feed every segment of a noiseless tree rooted at `origin` to `sink`
pub fn visit_tree<F: FnMut(LineSegment)>(
    params: &TreeParams,
    origin: DVec2,
    fan_out: FanOut,
    mut sink: F,
) {
    grow(params, fan_out, root(params, origin), &mut NoJitter, &mut sink);
}

/// Feed every segment of a noisy tree rooted at `origin` to `sink`
///
/// Two exponential samples (spread, then length) are drawn per emitted
/// segment, so a fixed seed reproduces the same tree.
pub fn visit_noisy_tree<R: GeneRng + ?Sized, F: FnMut(LineSegment)>(
    params: &TreeParams,
    origin: DVec2,
    fan_out: FanOut,
    rng: &mut R,
    mut sink: F,
) {
    grow(
        params,
        fan_out,
        root(params, origin),
        &mut ExpJitter(rng),
        &mut sink,
    );
}

/// Collect the segments of a noiseless tree
pub fn generate_tree(params: &TreeParams, origin: DVec2, fan_out: FanOut) -> Vec<LineSegment> {
    let mut segments = Vec::with_capacity(params.segment_count(fan_out).min(1 << 16));
    visit_tree(params, origin, fan_out, |segment| segments.push(segment));
    segments
}

/// Collect the segments of a noisy tree
pub fn generate_noisy_tree<R: GeneRng + ?Sized>(
    params: &TreeParams,
    origin: DVec2,
    fan_out: FanOut,
    rng: &mut R,
) -> Vec<LineSegment> {
    let mut segments = Vec::new();
    visit_noisy_tree(params, origin, fan_out, rng, |segment| segments.push(segment));
    segments
}
