// SPDX-License-Identifier: MIT

mod tracker;
mod types;

pub use tracker::ReachabilityTracker;
pub use types::{
    CoreVerifyOptions, Finding, ReportDisplay, ReportDisplayOpts, Severity, VerifierOptionsLike,
    VerifyPhases, VerifyReport,
};

pub use crate::core::errors::{FsCheckerError, FsCheckerResult};

/// Offline consistency check of an image.
///
/// Phases run in `VerifyPhases` order; each one appends findings and only
/// returns `Err` when the image cannot be read at all.
pub trait FsChecker: Sized {
    type Options: VerifierOptionsLike + Default;

    fn check_with(&mut self, opt: &Self::Options) -> FsCheckerResult<VerifyReport> {
        let mut rep = VerifyReport::default();
        let phases: [(VerifyPhases, PhaseFn<Self>); 4] = [
            (VerifyPhases::GEOMETRY, Self::check_geometry),
            (VerifyPhases::ROOT, Self::check_root),
            (VerifyPhases::CHAIN, Self::check_chain),
            (VerifyPhases::CROSSREF, Self::check_cross_reference),
        ];
        for (phase, f) in phases {
            if opt.fail_fast() && rep.has_error() {
                break;
            }
            self.run_phase(opt, &mut rep, phase, f)?;
        }
        Ok(rep)
    }

    fn check_all(&mut self) -> FsCheckerResult<VerifyReport> {
        self.check_with(&Self::Options::default())
    }

    fn check_geometry(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_root(&mut self, _opt: &Self::Options, _rep: &mut VerifyReport) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_chain(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_cross_reference(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }

    fn run_phase(
        &mut self,
        opt: &Self::Options,
        rep: &mut VerifyReport,
        phase: VerifyPhases,
        f: PhaseFn<Self>,
    ) -> FsCheckerResult<()> {
        if opt.phases().contains(phase) {
            f(self, opt, rep)?;
        }
        Ok(())
    }
}

/// Signature shared by every checker phase.
pub type PhaseFn<C> = fn(
    &mut C,
    &<C as FsChecker>::Options,
    &mut VerifyReport,
) -> FsCheckerResult<()>;
