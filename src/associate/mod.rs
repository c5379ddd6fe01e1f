//! Association-rule mining over discretized records.
//!
//! Numeric features are first turned into categorical tokens by splitting each
//! feature at its median (`feature:high` / `feature:low`). Each record becomes
//! a *transaction*: the set of its tokens. Frequent itemsets and rules are then
//! mined from those transactions.
//!
//! ## Measures
//!
//! For a rule `A → C` over `N` transactions:
//!
//! ```text
//! support    = count(A ∪ C) / N
//! confidence = count(A ∪ C) / count(A)
//! lift       = confidence / (count(C) / N)
//! ```
//!
//! Lift above 1 means `A` and `C` co-occur more often than independence would
//! predict.
//!
//! ## Bounded Apriori
//!
//! The miner stops at 2-itemsets: it finds frequent single tokens (L1), then
//! frequent pairs of L1 tokens (L2). Every rule therefore has exactly one
//! antecedent token and one consequent token. Pairwise rules are all the
//! dashboard presents, so the recursive k-itemset expansion is left out.
//!
//! ## Usage
//!
//! ```rust
//! use glean::associate::{Apriori, RuleGenerator, Transaction};
//!
//! let transactions: Vec<Transaction> = vec![
//!     ["a", "b"].into_iter().collect(),
//!     ["a", "b"].into_iter().collect(),
//!     ["a"].into_iter().collect(),
//!     ["b", "c"].into_iter().collect(),
//! ];
//!
//! let frequent = Apriori::new(0.5).mine(&transactions).unwrap();
//! assert_eq!(frequent.singles.len(), 2);
//! assert_eq!(frequent.pairs.len(), 1);
//!
//! let rules = RuleGenerator::new(0.6).generate(&frequent).unwrap();
//! assert_eq!(rules.len(), 2);
//! ```

mod apriori;
mod discretize;
mod rules;

pub use apriori::{Apriori, FrequentItemsets, Itemset};
pub use discretize::{discretize, feature_medians, token, Discretized, Level, Transaction};
pub use rules::{Rule, RuleGenerator};
