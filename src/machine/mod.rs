//! A candy dispenser modelled as a total finite-state machine.
//!
//! The machine has two inputs: inserting a [`Input::Coin`] unlocks a locked
//! machine that still holds candy, and [`Input::Turn`]ing the knob of an
//! unlocked machine dispenses one candy and locks it again. Every other
//! combination leaves the machine unchanged; no input is ever rejected.
//!
//! | state                     | Coin               | Turn                |
//! |---------------------------|--------------------|---------------------|
//! | locked, candies > 0       | unlock, coins + 1  | no-op               |
//! | locked, candies = 0       | no-op              | no-op               |
//! | unlocked, candies > 0     | no-op              | lock, candies - 1   |
//! | unlocked, candies = 0     | no-op              | no-op               |
//!
//! # Examples
//!
//! ```rust
//! use parstate::machine::{Input, Machine, simulate};
//!
//! let ((candies, coins), machine) = simulate(&[Input::Coin, Input::Turn], Machine::new(true, 5, 10));
//! assert_eq!((candies, coins), (4, 11));
//! assert_eq!(machine, Machine::new(true, 4, 11));
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::effect::State;

/// An event fed to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Input {
    /// Insert a coin.
    Coin,
    /// Turn the knob.
    Turn,
}

/// The dispenser's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Machine {
    /// Whether the knob is locked.
    pub locked: bool,
    /// Candies left.
    pub candies: u32,
    /// Coins collected.
    pub coins: u32,
}

impl Machine {
    /// Creates a machine in the given state.
    pub const fn new(locked: bool, candies: u32, coins: u32) -> Self {
        Self {
            locked,
            candies,
            coins,
        }
    }

    /// Applies a single input.
    #[must_use]
    pub const fn apply(self, input: Input) -> Self {
        let has_candy = self.candies > 0;
        match (input, self.locked, has_candy) {
            (Input::Coin, true, true) => Self {
                locked: false,
                candies: self.candies,
                coins: self.coins.saturating_add(1),
            },
            (Input::Turn, false, true) => Self {
                locked: true,
                candies: self.candies - 1,
                coins: self.coins,
            },
            (Input::Coin, true, false) | (Input::Coin, false, _) => self,
            (Input::Turn, false, false) | (Input::Turn, true, _) => self,
        }
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Machine(locked={}, candies={}, coins={})",
            self.locked, self.candies, self.coins
        )
    }
}

/// Describes feeding `inputs` to a machine, producing `(candies, coins)` of the
/// final machine.
pub fn simulate_machine(inputs: Vec<Input>) -> State<Machine, (u32, u32)> {
    State::traverse(inputs, |input: Input| {
        State::modify(move |current: Machine| {
            let next = current.apply(input);
            tracing::trace!(?input, before = %current, after = %next, "machine transition");
            next
        })
    })
    .then(State::gets(|machine: &Machine| (machine.candies, machine.coins)))
}

/// Runs `inputs` left to right against `machine`.
pub fn simulate(inputs: &[Input], machine: Machine) -> ((u32, u32), Machine) {
    simulate_machine(inputs.to_vec()).run(machine)
}
