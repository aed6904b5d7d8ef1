//! State threading: pure descriptions of `S -> (A, S)` transitions.
//!
//! A `State<S, A>` is a value that describes a state transition without
//! performing it. Running it with an initial state produces a result and the
//! next state. Nothing is evaluated while a `State` is being composed; all of
//! the work happens inside [`State::run`].
//!
//! # Laws
//!
//! - Left identity: `State::pure(a).flat_map(f)` runs like `f(a)`
//! - Right identity: `m.flat_map(State::pure)` runs like `m`
//! - Map/unit: `State::pure(a).fmap(f)` runs like `State::pure(f(a))`
//! - Associativity: `m.flat_map(f).flat_map(g)` runs like `m.flat_map(|x| f(x).flat_map(g))`
//! - Referential transparency: running the same value twice with the same
//!   input state yields the same `(A, S)`
//!
//! # Examples
//!
//! ```rust
//! use parstate::effect::State;
//!
//! let tick: State<u32, u32> = State::new(|count: u32| (count, count + 1));
//! let three = State::sequence(vec![tick.clone(), tick.clone(), tick]);
//!
//! let (values, final_count) = three.run(10);
//! assert_eq!(values, vec![10, 11, 12]);
//! assert_eq!(final_count, 13);
//! ```

#![forbid(unsafe_code)]

use std::rc::Rc;

type Transition<S, A> = Rc<dyn Fn(S) -> (A, S)>;

/// A pure, deferred state transition `S -> (A, S)`.
///
/// The transition is held behind an `Rc`, so cloning a `State` is cheap and
/// composed values share their building blocks.
pub struct State<S, A>
where
    S: 'static,
    A: 'static,
{
    transition: Transition<S, A>,
}

impl<S, A> State<S, A>
where
    S: 'static,
    A: 'static,
{
    /// Wraps a transition function.
    ///
    /// ```rust
    /// use parstate::effect::State;
    ///
    /// let state: State<i32, i32> = State::new(|s: i32| (s * 2, s + 1));
    /// assert_eq!(state.run(10), (20, 11));
    /// ```
    pub fn new<F>(transition: F) -> Self
    where
        F: Fn(S) -> (A, S) + 'static,
    {
        Self {
            transition: Rc::new(transition),
        }
    }

    /// Alias of [`State::new`].
    pub fn from_transition<F>(transition: F) -> Self
    where
        F: Fn(S) -> (A, S) + 'static,
    {
        Self::new(transition)
    }

    /// Runs the transition against `initial_state`.
    pub fn run(&self, initial_state: S) -> (A, S) {
        (self.transition)(initial_state)
    }

    /// Runs the transition and keeps only the produced value.
    pub fn eval(&self, initial_state: S) -> A {
        self.run(initial_state).0
    }

    /// Runs the transition and keeps only the final state.
    pub fn exec(&self, initial_state: S) -> S {
        self.run(initial_state).1
    }

    /// Produces `value` and leaves the state untouched.
    ///
    /// ```rust
    /// use parstate::effect::State;
    ///
    /// let state: State<i32, &str> = State::pure("constant");
    /// assert_eq!(state.run(42), ("constant", 42));
    /// ```
    pub fn pure(value: A) -> Self
    where
        A: Clone,
    {
        Self::new(move |state| (value.clone(), state))
    }

    /// Alias of [`State::pure`].
    pub fn unit(value: A) -> Self
    where
        A: Clone,
    {
        Self::pure(value)
    }

    /// Applies `function` to the produced value. The state passes through unchanged.
    pub fn fmap<B, F>(self, function: F) -> State<S, B>
    where
        F: Fn(A) -> B + 'static,
        B: 'static,
    {
        let transition = self.transition;
        State::new(move |state| {
            let (value, next_state) = transition(state);
            (function(value), next_state)
        })
    }

    /// Runs `self`, feeds its value to `function` and runs the resulting
    /// description against the intermediate state.
    ///
    /// ```rust
    /// use parstate::effect::State;
    ///
    /// let state: State<i32, i32> = State::new(|s: i32| (s, s + 1));
    /// let chained = state.flat_map(|value| State::new(move |s: i32| (value + s, s * 2)));
    /// assert_eq!(chained.run(10), (21, 22));
    /// ```
    pub fn flat_map<B, F>(self, function: F) -> State<S, B>
    where
        F: Fn(A) -> State<S, B> + 'static,
        B: 'static,
    {
        let transition = self.transition;
        State::new(move |state| {
            let (value, intermediate_state) = transition(state);
            function(value).run(intermediate_state)
        })
    }

    /// Alias of [`State::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> State<S, B>
    where
        F: Fn(A) -> State<S, B> + 'static,
        B: 'static,
    {
        self.flat_map(function)
    }

    /// Runs `self`, discards its value, then runs `next`.
    #[must_use]
    pub fn then<B>(self, next: State<S, B>) -> State<S, B>
    where
        B: 'static,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Runs `self` then `other` on the state `self` produced, and combines both values.
    ///
    /// Threading is left to right: `other` observes the state left behind by `self`.
    ///
    /// ```rust
    /// use parstate::effect::State;
    ///
    /// let first: State<i32, i32> = State::new(|s: i32| (s, s + 1));
    /// let second: State<i32, i32> = State::new(|s: i32| (s * 2, s + 1));
    /// assert_eq!(first.map2(second, |a, b| a + b).run(10), (32, 12));
    /// ```
    pub fn map2<B, C, F>(self, other: State<S, B>, function: F) -> State<S, C>
    where
        F: Fn(A, B) -> C + 'static,
        B: 'static,
        C: 'static,
    {
        let first = self.transition;
        let second = other.transition;
        State::new(move |state| {
            let (value_a, intermediate_state) = first(state);
            let (value_b, final_state) = second(intermediate_state);
            (function(value_a, value_b), final_state)
        })
    }

    /// Pairs the values of `self` and `other`.
    #[must_use]
    pub fn product<B>(self, other: State<S, B>) -> State<S, (A, B)>
    where
        B: 'static,
    {
        self.map2(other, |a, b| (a, b))
    }

    /// Alias of [`State::product`].
    #[must_use]
    pub fn both<B>(self, other: State<S, B>) -> State<S, (A, B)>
    where
        B: 'static,
    {
        self.product(other)
    }

    /// [`State::fmap`] expressed through `flat_map` and `pure`.
    ///
    /// Runs identically to `fmap`; kept as an executable statement of that law.
    pub fn map_via_flat_map<B, F>(self, function: F) -> State<S, B>
    where
        F: Fn(A) -> B + 'static,
        B: Clone + 'static,
    {
        self.flat_map(move |value| State::pure(function(value)))
    }

    /// [`State::map2`] expressed through nested `flat_map`s.
    pub fn map2_via_flat_map<B, C, F>(self, other: State<S, B>, function: F) -> State<S, C>
    where
        F: Fn(A, B) -> C + 'static,
        A: Clone,
        B: 'static,
        C: Clone + 'static,
    {
        let function = Rc::new(function);
        self.flat_map(move |value_a| {
            let function = Rc::clone(&function);
            other
                .clone()
                .flat_map(move |value_b| State::pure(function(value_a.clone(), value_b)))
        })
    }

    /// Threads the state through every element left to right and collects
    /// the values in input order.
    ///
    /// This is the right fold `states.fold_right(pure(vec![]), map2(.., push))`
    /// evaluated as a loop inside one transition, so the stack stays flat
    /// however long the list is.
    pub fn sequence(states: Vec<Self>) -> State<S, Vec<A>> {
        let transitions: Rc<[Transition<S, A>]> =
            states.into_iter().map(|state| state.transition).collect();
        State::new(move |initial_state| {
            let mut values = Vec::with_capacity(transitions.len());
            let mut state = initial_state;
            for transition in transitions.iter() {
                let (value, next_state) = transition(state);
                values.push(value);
                state = next_state;
            }
            (values, state)
        })
    }

    /// Maps every item to a description and sequences the results.
    pub fn traverse<T, I, F>(items: I, function: F) -> State<S, Vec<A>>
    where
        I: IntoIterator<Item = T>,
        F: Fn(T) -> Self,
    {
        Self::sequence(items.into_iter().map(function).collect())
    }
}

impl<St> State<St, St>
where
    St: Clone + 'static,
{
    /// Produces the current state as the value.
    #[must_use]
    pub fn get() -> Self {
        Self::new(|state: St| (state.clone(), state))
    }
}

impl<S> State<S, ()>
where
    S: 'static,
{
    /// Replaces the state with `new_state`.
    pub fn put(new_state: S) -> Self
    where
        S: Clone,
    {
        Self::new(move |_| ((), new_state.clone()))
    }

    /// Replaces the state with `modifier(state)`.
    pub fn modify<F>(modifier: F) -> Self
    where
        F: Fn(S) -> S + 'static,
    {
        Self::new(move |state| ((), modifier(state)))
    }
}

impl<S, A> State<S, A>
where
    S: 'static,
    A: 'static,
{
    /// Produces a value projected from the current state.
    pub fn gets<F>(projection: F) -> Self
    where
        F: Fn(&S) -> A + 'static,
    {
        Self::new(move |state| {
            let value = projection(&state);
            (value, state)
        })
    }
}

impl<S, A> Clone for State<S, A>
where
    S: 'static,
    A: 'static,
{
    fn clone(&self) -> Self {
        Self {
            transition: Rc::clone(&self.transition),
        }
    }
}

impl<S, A> std::fmt::Display for State<S, A>
where
    S: 'static,
    A: 'static,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "<State>")
    }
}
