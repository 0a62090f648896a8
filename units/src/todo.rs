/// Quantities which are simply type aliases for `f32` rather than having an
/// implementation as a `uom` `Quantity`.
///
/// This may be because:
///
/// + Voxel values in MPMs carry whatever unit the map was written in (R1 in
///   1000/s, PD in p.u., MT in p.u.) and that unit is only known at runtime,
///   from the metadata sidecar.
///
/// + There is no `uom` dimension for them (probabilities, arbitrary
///   intensities), but we still want some clues in the source as to what they
///   represent.

pub type Intensityf32   = f32;
pub type Probabilityf32 = f32;
