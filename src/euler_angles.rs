use crate::impl_component_views;
use core::fmt::{Debug, Formatter};
use uniform_array_derive::UniformArray;

/// Tait-Bryan angles (roll about `x`, pitch about `y`, yaw about `z`, applied in `z-y-x` order).
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct EulerAngles<T> {
    /// The roll angle, in radians.
    pub roll_phi: T,
    /// The pitch angle, in radians.
    pub pitch_theta: T,
    /// The yaw angle, in radians.
    pub yaw_psi: T,
}

impl<T> EulerAngles<T> {
    /// Initializes a new [`EulerAngles`] instance.
    #[inline(always)]
    pub const fn new(roll_phi: T, pitch_theta: T, yaw_psi: T) -> Self {
        Self {
            roll_phi,
            pitch_theta,
            yaw_psi,
        }
    }
}

impl<T> Default for EulerAngles<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default(), Default::default())
    }
}

impl<T> Clone for EulerAngles<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            roll_phi: self.roll_phi.clone(),
            pitch_theta: self.pitch_theta.clone(),
            yaw_psi: self.yaw_psi.clone(),
        }
    }
}

impl<T> Debug for EulerAngles<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EulerAngles")
            .field("roll", &self.roll_phi)
            .field("pitch", &self.pitch_theta)
            .field("yaw", &self.yaw_psi)
            .finish()
    }
}

impl_component_views!(EulerAngles, T, 3, [roll_phi, pitch_theta, yaw_psi]);
