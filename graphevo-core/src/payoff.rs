//! Game matrices and payoff accumulation

use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::strategy::Strategy;

/// Symmetric 2x2 game.
///
/// Entries are the payoff to the row player:
/// - `r`: cooperator meets cooperator (reward)
/// - `s`: cooperator meets defector (sucker)
/// - `t`: defector meets cooperator (temptation)
/// - `p`: defector meets defector (punishment)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMatrix {
    pub r: f64,
    pub s: f64,
    pub t: f64,
    pub p: f64,
}

impl GameMatrix {
    pub const fn new(r: f64, s: f64, t: f64, p: f64) -> Self {
        Self { r, s, t, p }
    }

    /// Donation game: cooperators pay `c` to give `b` to their partner
    pub fn donation(b: f64, c: f64) -> Self {
        Self {
            r: b - c,
            s: -c,
            t: b,
            p: 0.0,
        }
    }

    /// Payoff to a player using `me` against `other`
    #[inline]
    pub fn payoff(&self, me: Strategy, other: Strategy) -> f64 {
        match (me, other) {
            (Strategy::Cooperate, Strategy::Cooperate) => self.r,
            (Strategy::Cooperate, Strategy::Defect) => self.s,
            (Strategy::Defect, Strategy::Cooperate) => self.t,
            (Strategy::Defect, Strategy::Defect) => self.p,
        }
    }
}

impl Default for GameMatrix {
    fn default() -> Self {
        GameMatrix::donation(3.0, 1.0)
    }
}

/// Shorthand for [`GameMatrix::donation`]
pub fn donation_to_matrix(b: f64, c: f64) -> GameMatrix {
    GameMatrix::donation(b, c)
}

/// How a game is specified in configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameSpec {
    Matrix(GameMatrix),
    Donation { b: f64, c: f64 },
}

impl GameSpec {
    pub fn matrix(&self) -> GameMatrix {
        match *self {
            GameSpec::Matrix(matrix) => matrix,
            GameSpec::Donation { b, c } => GameMatrix::donation(b, c),
        }
    }
}

impl Default for GameSpec {
    fn default() -> Self {
        GameSpec::Donation { b: 3.0, c: 1.0 }
    }
}

impl From<GameMatrix> for GameSpec {
    fn from(matrix: GameMatrix) -> Self {
        GameSpec::Matrix(matrix)
    }
}

/// Accumulated payoff of every node against all of its neighbors.
///
/// `strategies` must be index-aligned with the graph's nodes.
pub fn compute_payoffs(graph: &Graph, strategies: &[Strategy], matrix: &GameMatrix) -> Vec<f64> {
    debug_assert_eq!(graph.len(), strategies.len());

    (0..graph.len())
        .map(|node| {
            let me = strategies[node];
            graph
                .neighbors(node)
                .iter()
                .map(|&other| matrix.payoff(me, strategies[other]))
                .sum()
        })
        .collect()
}
