pub mod apply;
pub mod config;
pub mod graph;
pub mod info;

use clap::ValueEnum;
use deluxe_core::filters::median_blur::Neighborhood;
use deluxe_core::meta::sharpen::Technique;

#[derive(Clone, Copy, ValueEnum)]
pub enum TechniqueArg {
    Median,
    Denoise,
    Box,
    Mcb,
    Ds,
    Nr,
    Lens,
    Gaussian,
}

impl From<TechniqueArg> for Technique {
    fn from(arg: TechniqueArg) -> Self {
        match arg {
            TechniqueArg::Median => Technique::Median,
            TechniqueArg::Denoise => Technique::Denoise,
            TechniqueArg::Box => Technique::Box,
            TechniqueArg::Mcb => Technique::MeanCurvature,
            TechniqueArg::Ds => Technique::DomainSmooth,
            TechniqueArg::Nr => Technique::NoiseReduction,
            TechniqueArg::Lens => Technique::Lens,
            TechniqueArg::Gaussian => Technique::Gaussian,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShapeArg {
    Square,
    Circle,
    Diamond,
}

impl From<ShapeArg> for Neighborhood {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Square => Neighborhood::Square,
            ShapeArg::Circle => Neighborhood::Circle,
            ShapeArg::Diamond => Neighborhood::Diamond,
        }
    }
}
