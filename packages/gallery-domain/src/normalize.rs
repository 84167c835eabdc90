//! Rewrites quantified SOME_OF nodes into plain AND/OR trees.

use itertools::Itertools;

use crate::{
	Error, Result,
	query::{ListQuery, SearchQuery, SomeOfQuery},
};

/// Returns a tree without SOME_OF nodes that matches exactly the same records.
///
/// `max_combinations` bounds the AND-branches generated across the whole tree, including the
/// re-expansion of SOME_OF nodes copied into several branches. Each node is checked against the
/// remaining budget before enumeration, so oversized requests fail without allocating them.
pub fn normalize(query: SearchQuery, max_combinations: u64) -> Result<SearchQuery> {
	Normalizer { limit: max_combinations, remaining: max_combinations }.rewrite(query)
}

/// Number of `k`-element subsets of an `n`-element set, or `None` on overflow.
pub fn combination_count(n: u64, k: u64) -> Option<u64> {
	if k > n {
		return Some(0);
	}

	let k = k.min(n - k);
	let mut count: u64 = 1;

	for i in 0..k {
		// Exact at every step: the running product of i + 1 consecutive integers divided by
		// (i + 1)! is itself a binomial coefficient.
		count = count.checked_mul(n - i)? / (i + 1);
	}

	Some(count)
}

struct Normalizer {
	limit: u64,
	/// AND-branches still allowed for the rest of the tree.
	remaining: u64,
}
impl Normalizer {
	fn rewrite(&mut self, query: SearchQuery) -> Result<SearchQuery> {
		match query {
			SearchQuery::List(ListQuery { kind, children }) => {
				let children = children
					.into_iter()
					.map(|child| self.rewrite(child))
					.collect::<Result<Vec<_>>>()?;

				Ok(SearchQuery::List(ListQuery { kind, children }))
			},
			SearchQuery::SomeOf(some_of) => self.expand_some_of(some_of),
			leaf => Ok(leaf),
		}
	}

	fn expand_some_of(&mut self, some_of: SomeOfQuery) -> Result<SearchQuery> {
		let SomeOfQuery { min, children } = some_of;
		let n = children.len();
		let min = min.unwrap_or(1) as usize;

		if min == 0 || min > n {
			return Err(Error::InvalidQueryShape {
				message: format!("some_of.min must be between 1 and {n}, got {min}."),
			});
		}
		if min == 1 {
			return self.rewrite(SearchQuery::or(children));
		}
		if min == n {
			return self.rewrite(SearchQuery::and(children));
		}

		let count = combination_count(n as u64, min as u64).unwrap_or(u64::MAX);

		if count > self.remaining {
			return Err(Error::InvalidQueryShape {
				message: format!(
					"some_of expands to {count} more combinations, above the limit of {} \
					 for the whole query.",
					self.limit
				),
			});
		}

		self.remaining -= count;

		let branches = children
			.into_iter()
			.combinations(min)
			.map(SearchQuery::and)
			.collect::<Vec<_>>();

		self.rewrite(SearchQuery::or(branches))
	}
}
