use fast_image_convolve as fc;

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum Algorithm {
    /// Spatial convolution for small kernels, spectral one for big kernels.
    Auto,
    /// Direct summation in the spatial domain.
    Spatial,
    /// Multiplication of spectra in the frequency domain.
    Spectral,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum SpectralMultiply {
    /// Multiplication of real and imaginary parts.
    Complex,
    /// Multiplication of magnitudes and addition of phases.
    Polar,
}

impl From<SpectralMultiply> for fc::SpectralMultiply {
    fn from(multiply: SpectralMultiply) -> Self {
        match multiply {
            SpectralMultiply::Complex => fc::SpectralMultiply::Complex,
            SpectralMultiply::Polar => fc::SpectralMultiply::Polar,
        }
    }
}

pub fn convolution_alg(algorithm: Algorithm, multiply: SpectralMultiply) -> fc::ConvolutionAlg {
    match algorithm {
        Algorithm::Auto => fc::ConvolutionAlg::Auto(multiply.into()),
        Algorithm::Spatial => fc::ConvolutionAlg::Spatial,
        Algorithm::Spectral => fc::ConvolutionAlg::Spectral(multiply.into()),
    }
}
