//! Property-based tests for the candy machine.
//!
//! - **Monotonicity**: candies never increase, coins never decrease
//! - **No-ops**: coin into an unlocked machine, turn on a locked machine
//! - **Fold**: `simulate` equals applying the inputs one by one

use parstate::machine::{Input, Machine, simulate, simulate_machine};
use proptest::prelude::*;

fn input_strategy() -> impl Strategy<Value = Input> {
    prop_oneof![Just(Input::Coin), Just(Input::Turn)]
}

fn machine_strategy() -> impl Strategy<Value = Machine> {
    (any::<bool>(), 0u32..20, 0u32..1000).prop_map(|(locked, candies, coins)| Machine::new(locked, candies, coins))
}

proptest! {
    #[test]
    fn prop_machine_is_monotone(
        machine in machine_strategy(),
        inputs in prop::collection::vec(input_strategy(), 0..100),
    ) {
        let mut current = machine;
        for input in inputs {
            let next = current.apply(input);
            prop_assert!(next.candies <= current.candies);
            prop_assert!(next.coins >= current.coins);
            current = next;
        }
    }

    #[test]
    fn prop_coin_into_unlocked_is_noop(candies in 0u32..20, coins in 0u32..1000) {
        let machine = Machine::new(false, candies, coins);
        prop_assert_eq!(machine.apply(Input::Coin), machine);
    }

    #[test]
    fn prop_turn_on_locked_is_noop(candies in 0u32..20, coins in 0u32..1000) {
        let machine = Machine::new(true, candies, coins);
        prop_assert_eq!(machine.apply(Input::Turn), machine);
    }

    #[test]
    fn prop_simulate_is_left_fold(
        machine in machine_strategy(),
        inputs in prop::collection::vec(input_strategy(), 0..100),
    ) {
        let expected = inputs.iter().fold(machine, |current, input| current.apply(*input));
        let ((candies, coins), final_machine) = simulate(&inputs, machine);
        prop_assert_eq!(final_machine, expected);
        prop_assert_eq!((candies, coins), (expected.candies, expected.coins));
    }

    #[test]
    fn prop_simulation_is_repeatable(
        machine in machine_strategy(),
        inputs in prop::collection::vec(input_strategy(), 0..50),
    ) {
        let program = simulate_machine(inputs);
        prop_assert_eq!(program.run(machine), program.run(machine));
    }

    #[test]
    fn prop_dispensed_candies_match_collected_coins(
        candies in 0u32..20,
        inputs in prop::collection::vec(input_strategy(), 0..100),
    ) {
        // Starting locked, every dispense is preceded by exactly one paid unlock.
        let start = Machine::new(true, candies, 0);
        let (_, end) = simulate(&inputs, start);
        let dispensed = start.candies - end.candies;
        let paid = end.coins;
        prop_assert!(paid == dispensed || paid == dispensed + 1);
        prop_assert_eq!(paid == dispensed + 1, !end.locked);
    }
}

#[test]
fn coin_then_turn_scenario() {
    let result = simulate(&[Input::Coin, Input::Turn], Machine::new(true, 5, 10));
    assert_eq!(result, ((4, 11), Machine::new(true, 4, 11)));
}
