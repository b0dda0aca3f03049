// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{string::String, vec::Vec};
use core::fmt;

use bitflags::bitflags;

/// Ordered from least to most serious.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    fn tag(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERR ",
        }
    }
}

/// One checker observation, keyed by a dotted code such as `CHAIN.LOOP`.
#[derive(Clone, Debug)]
pub struct Finding {
    pub sev: Severity,
    pub code: &'static str,
    pub msg: String,
}

impl Finding {
    pub fn new(sev: Severity, code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev,
            code,
            msg: msg.into(),
        }
    }

    pub fn info(code: &'static str, msg: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, msg)
    }

    pub fn warn(code: &'static str, msg: impl Into<String>) -> Self {
        Self::new(Severity::Warn, code, msg)
    }

    pub fn err(code: &'static str, msg: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, msg)
    }
}

#[derive(Clone, Debug, Default)]
pub struct VerifyReport {
    pub findings: Vec<Finding>,
}

impl VerifyReport {
    fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.sev == Severity::Error)
    }

    pub fn has_error(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.errors().next().map(|f| f.msg.as_str())
    }

    pub fn ok(&self) -> bool {
        !self.has_error()
    }

    pub fn push(&mut self, f: Finding) {
        self.findings.push(f)
    }

    pub fn count(&self, s: Severity) -> usize {
        self.findings.iter().filter(|f| f.sev == s).count()
    }

    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.code == code)
    }

    pub fn display_with(&self, opts: ReportDisplayOpts) -> ReportDisplay<'_> {
        ReportDisplay::new(self, opts)
    }

    /// Hides `Info` findings.
    pub fn warn_and_errors(&self) -> ReportDisplay<'_> {
        self.display_with(ReportDisplayOpts {
            min_level: Severity::Warn,
            ..ReportDisplayOpts::default()
        })
    }
}

#[derive(Copy, Clone, Debug)]
pub struct ReportDisplayOpts {
    pub min_level: Severity,
    /// Written before every line.
    pub prefix: &'static str,
    pub show_summary: bool,
    /// Column width for the finding code.
    pub pad_code: usize,
}

impl Default for ReportDisplayOpts {
    fn default() -> Self {
        Self {
            min_level: Severity::Info,
            prefix: "",
            show_summary: false,
            pad_code: 12,
        }
    }
}

pub struct ReportDisplay<'a> {
    rep: &'a VerifyReport,
    opts: ReportDisplayOpts,
}

impl<'a> ReportDisplay<'a> {
    pub fn new(rep: &'a VerifyReport, opts: ReportDisplayOpts) -> Self {
        Self { rep, opts }
    }
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ReportDisplayOpts {
            min_level,
            prefix,
            show_summary,
            pad_code,
        } = self.opts;

        for it in self.rep.findings.iter().filter(|it| it.sev >= min_level) {
            writeln!(
                f,
                "{prefix}{}: {:<pad_code$} {}",
                it.sev.tag(),
                it.code,
                it.msg
            )?;
        }

        if show_summary {
            let shown = |s: Severity| if s >= min_level { self.rep.count(s) } else { 0 };
            writeln!(
                f,
                "{prefix}Summary: errors={}  warns={}  infos={}",
                shown(Severity::Error),
                shown(Severity::Warn),
                shown(Severity::Info)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display_with(ReportDisplayOpts::default()).fmt(f)
    }
}

bitflags! {
    /// Checker passes, run in declaration order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct VerifyPhases: u32 {
        const GEOMETRY = 1 << 0;
        const ROOT     = 1 << 1;
        const CHAIN    = 1 << 2;
        const CROSSREF = 1 << 3;
        const ALL      = Self::GEOMETRY.bits()
            | Self::ROOT.bits()
            | Self::CHAIN.bits()
            | Self::CROSSREF.bits();
    }
}

/// Accessors the phase driver needs from a filesystem's option type.
pub trait VerifierOptionsLike {
    fn phases(&self) -> VerifyPhases {
        VerifyPhases::ALL
    }
    fn fail_fast(&self) -> bool {
        false
    }
}

#[derive(Clone, Debug)]
pub struct CoreVerifyOptions {
    pub phases: VerifyPhases,
    /// Skip remaining phases once an error is recorded.
    pub fail_fast: bool,
}

impl VerifierOptionsLike for CoreVerifyOptions {
    fn phases(&self) -> VerifyPhases {
        self.phases
    }
    fn fail_fast(&self) -> bool {
        self.fail_fast
    }
}

impl Default for CoreVerifyOptions {
    fn default() -> Self {
        Self {
            phases: VerifyPhases::ALL,
            fail_fast: false,
        }
    }
}
