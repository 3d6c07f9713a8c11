//! Common assertion helpers for test output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for git repository error messages
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

/// Creates a predicate that checks for the error prefix used by `print_error`
pub fn has_error(message: &str) -> impl Predicate<str> {
    predicates::str::contains("Error:").and(predicates::str::contains(message.to_string()))
}

/// Creates a predicate that checks for a branch-not-found error
pub fn branch_not_found(name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Branch '{name}' does not exist"))
}

/// Creates a predicate that checks for a successful branch switch
pub fn switched_to(name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Switched to branch '{name}'"))
}

/// Creates a predicate that checks for a tag in `#tag` form
pub fn has_tag(tag: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("#{tag}"))
}
