// SPDX-License-Identifier: MIT

/// Generates the `From` conversions between the error layers.
///
/// - `top`: each listed layer error wraps into the named top-level variant.
/// - `str_into`: `&'static str` becomes `Other` on every listed layer and on the top error.
/// - `sub`: a lower error wraps into specific variants of other layers.
#[macro_export]
macro_rules! fs_error_wiring {
    (
        top => $top:ty {
            $($layer:ty : $variant:ident),+ $(,)?
        },
        str_into => [ $($str_tgt:ty),* $(,)? ],
        sub => {
            $($src:ty => [ $($dst:ident::$dst_variant:ident),+ ] ),* $(,)?
        } $(,)?
    ) => {
        $( $crate::fs_error_wiring!(@from $layer => $top, $variant); )+

        $( $crate::fs_error_wiring!(@from &'static str => $str_tgt, Other); )*
        $crate::fs_error_wiring!(@from &'static str => $top, Other);

        $( $( $crate::fs_error_wiring!(@from $src => $dst, $dst_variant); )+ )*
    };

    (@from $src:ty => $dst:ty, $variant:ident) => {
        impl From<$src> for $dst {
            #[inline]
            fn from(e: $src) -> Self {
                <$dst>::$variant(e)
            }
        }
    };
}

/// Returns `Err($err.into())` unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

#[macro_export]
macro_rules! bail {
    ($err:expr $(,)?) => {
        return Err($err.into())
    };
}

#[cfg(test)]
mod tests {
    use crate::core::errors::*;

    fn checked(n: u64) -> FsResult<u64> {
        crate::ensure!(n.is_multiple_of(2), FsError::InvalidOffset);
        if n > 100 {
            crate::bail!("too large");
        }
        Ok(n / 2)
    }

    #[test]
    fn test_early_returns() {
        assert_eq!(checked(8), Ok(4));
        assert_eq!(checked(3), Err(FsError::InvalidOffset));
        assert_eq!(checked(200), Err(FsError::Other("too large")));
    }

    #[test]
    fn test_layer_wiring() {
        let e: FsError = FsPathError::TooDeep.into();
        assert_eq!(e, FsError::Path(FsPathError::TooDeep));
        let e: FsCheckerError = DuoIOError::ShortRead.into();
        assert_eq!(e, FsCheckerError::IO(DuoIOError::ShortRead));
        let e: FsAllocatorError = "gone".into();
        assert_eq!(e, FsAllocatorError::Other("gone"));
    }
}
