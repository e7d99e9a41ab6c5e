//! Collects violations for one file on behalf of a rule.

use styleguide_lint_core::{FileContext, Rule, TokenRef, Violation};

use crate::fix::NodeRegexFix;

/// Prefix of every style message.
pub const MESSAGE_PREFIX: &str = "wmf-style:";

pub(crate) struct Notifier<'c, 'a> {
    ctx: &'c FileContext<'a>,
    rule: &'c dyn Rule,
    violations: Vec<Violation>,
}

impl<'c, 'a> Notifier<'c, 'a> {
    pub(crate) fn new(ctx: &'c FileContext<'a>, rule: &'c dyn Rule) -> Self {
        Self {
            ctx,
            rule,
            violations: Vec::new(),
        }
    }

    /// Reports a violation at `token`.
    pub(crate) fn error(&mut self, token: TokenRef<'_>, message: impl AsRef<str>) {
        let message = prefixed(message.as_ref());
        self.violations
            .push(self.ctx.violation_at(self.rule, token.index(), message));
    }

    /// Reports a violation of a whole declaration.
    pub(crate) fn error_at_start(&mut self, message: impl AsRef<str>) {
        let message = prefixed(message.as_ref());
        self.violations
            .push(self.ctx.violation_at_start(self.rule, message));
    }

    /// Reports a violation at `token` that `fix` can resolve.
    pub(crate) fn fixable(
        &mut self,
        token: TokenRef<'_>,
        message: impl AsRef<str>,
        fix: NodeRegexFix,
    ) {
        let message = prefixed(message.as_ref());
        self.violations.push(
            self.ctx
                .violation_at(self.rule, token.index(), message)
                .with_fix_tag(fix.tag()),
        );
    }

    pub(crate) fn finish(self) -> Vec<Violation> {
        self.violations
    }
}

fn prefixed(message: &str) -> String {
    format!("{MESSAGE_PREFIX} {message}")
}
