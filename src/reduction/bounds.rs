use crate::{
    error::{AnalysisError, Result},
    field::Field,
    keys::HeightIntervalMode,
};
use ndarray::ArrayViewD;

/// The bottom and top of a height interval, one value per column.
///
/// Both fields have the horizontal grid of the field being reduced, that is its dimensions
/// without `"z"`. How the values are referenced (above ground or above mean sea level) is given
/// separately by a [`HeightIntervalMode`].
#[derive(Debug, Clone, Copy)]
pub struct HeightBounds<'a> {
    /// Lower bound of the interval, in m.
    pub bottom: &'a Field,
    /// Upper bound of the interval, in m.
    pub top: &'a Field,
}

impl<'a> HeightBounds<'a> {
    /// Pair up the bottom and top bounds.
    pub fn new(bottom: &'a Field, top: &'a Field) -> Self {
        HeightBounds { bottom, top }
    }

    /// Check that the interval can be referenced to mean sea level in the given mode.
    ///
    /// Modes with a bound above ground need the surface height, and converting them is not
    /// supported yet.
    pub(crate) fn check_mode(mode: HeightIntervalMode, hsurf: Option<&Field>) -> Result<()> {
        if mode.needs_surface_height() {
            if hsurf.is_none() {
                return Err(AnalysisError::MissingRequiredInput(
                    "surface height is required for height intervals above ground",
                ));
            }
            return Err(AnalysisError::NotImplemented(
                "height intervals referenced to the ground",
            ));
        }
        Ok(())
    }

    /// Check that both bounds, and the surface height if given, are on the horizontal grid of
    /// `field`.
    pub(crate) fn check_grid(&self, field: &Field, hsurf: Option<&Field>) -> Result<()> {
        field.check_horizontal_grid(self.bottom)?;
        field.check_horizontal_grid(self.top)?;
        if let Some(hsurf) = hsurf {
            field.check_horizontal_grid(hsurf)?;
        }
        Ok(())
    }

    /// The bounds above mean sea level, only valid after `check_mode` accepted the mode.
    pub(crate) fn amsl(&self) -> (ArrayViewD<'a, f64>, ArrayViewD<'a, f64>) {
        (self.bottom.data().view(), self.top.data().view())
    }
}
