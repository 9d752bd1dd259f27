use num_traits::Float;
use std::io::Write;
use std::iter::zip;

use crate::error::PercolationError;

/// Mean and spread of the percolation probability at one `(l, p)` point.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PercolationResults<T> where T: Float
{
    pub mean: T,
    pub std: T,
}

impl<T> PercolationResults<T> where T: Float
{
    /// Population statistics (no Bessel correction) over the samples.
    pub fn from_samples(samples: &[T]) -> Result<Self, PercolationError>
    {
        if samples.is_empty()
        {
            return Err(PercolationError::InvalidArgument(String::from("Cannot aggregate an empty sample")));
        }
        let count = T::from(samples.len()).ok_or_else(|| PercolationError::InvalidArgument(String::from("Sample count not representable")))?;
        let mean  = samples.iter().fold(T::zero(), |acc, &x| acc + x) / count;
        let var   = samples.iter().fold(T::zero(), |acc, &x| acc + (x - mean).powi(2)) / count;
        Ok(Self { mean, std: var.sqrt() })
    }
}

impl<T> PercolationResults<T> where T: Float + std::fmt::Display
{
    pub fn write_to_file(file_name: &str, side: usize, probabilities: &[T], results: &[PercolationResults<T>], elapsed_time: std::time::Duration) -> std::io::Result<()>
    {
        let mut file = std::fs::File::create(file_name)?;
        writeln!(&mut file, "l, p, mean, std, elapsed_time: {}", elapsed_time.as_secs())?;
        Self::write_rows(&mut file, side, probabilities, results)
    }
    /// Appends rows for another lattice size to an existing results file.
    pub fn append_to_file(file_name: &str, side: usize, probabilities: &[T], results: &[PercolationResults<T>]) -> std::io::Result<()>
    {
        let mut file = std::fs::OpenOptions::new().append(true).open(file_name)?;
        Self::write_rows(&mut file, side, probabilities, results)
    }
    fn write_rows<W: Write>(out: &mut W, side: usize, probabilities: &[T], results: &[PercolationResults<T>]) -> std::io::Result<()>
    {
        if probabilities.len() != results.len()
        {
            return Err(std::io::Error::other("Results length should match probabilities length"));
        }
        for (&p, res) in zip(probabilities, results)
        {
            writeln!(out, "{side}, {p}, {}, {}", res.mean, res.std)?;
        }
        Ok(())
    }
}

/// Evenly spaced values in `[start, stop)`.
pub fn arange<T>(start: T, stop: T, step: T) -> Result<Vec<T>, PercolationError> where T: Float
{
    if step == T::zero() || step.is_nan()
    {
        return Err(PercolationError::InvalidArgument(String::from("Arange: step must be non zero")));
    }

    let direction_sign = (stop - start).signum();
    if step.signum() != direction_sign
    {
        return Err(PercolationError::InvalidArgument(String::from("Arange: if stop > (<) start then step must be positive (negative)")));
    }
    // Round-off slack so that e.g. 0.8 / 0.01 = 80.00000000000001 still gives 80 values.
    let slack         = T::from(1e-9).unwrap_or_else(T::epsilon);
    let num_of_values = ((stop - start).abs() / step.abs() - slack).ceil().max(T::zero()).to_usize()
        .ok_or_else(|| PercolationError::InvalidArgument(String::from("Arange: too many values")))?;
    let my_arange = (0..num_of_values)
        .map(|val| T::from(val).map(|val| start + step * val))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| PercolationError::InvalidArgument(String::from("Arange: value not representable")))?;
    Ok(my_arange)
}
