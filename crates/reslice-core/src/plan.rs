//! Transform operation planning and execution.
//!
//! `TransformPlan::new` does everything that can fail for a reason other
//! than the volume samples themselves: option requirements, loading the
//! reference and template headers, transform resolution, building the output
//! header and the reslice filter. `execute` then only moves samples, so a
//! failed plan never leaves a partial output behind.

use std::path::Path;

use burn::tensor::backend::Backend;
use tracing::info;

use crate::config::ValidatedOptions;
use crate::error::{ResliceError, Result};
use crate::filter::ResliceFilter;
use crate::image::{Image, ImageHeader, VoxelAccess, VoxelBuffer};
use crate::interpolation::InterpolationMethod;
use crate::resolver::{ResolvedTransform, TransformResolver};
use crate::transform::AffineTransform;

/// Supplies reference and template headers by path.
///
/// Image I/O lives outside this crate; front ends implement this for
/// whatever header format they read.
pub trait GridProvider {
    fn load_header(&self, path: &Path) -> Result<ImageHeader>;
}

/// Output of an executed plan.
#[derive(Debug, Clone)]
pub struct TransformOutput<B: Backend> {
    pub header: ImageHeader,
    pub image: Image<B>,
}

/// Fully resolved transform operation.
#[derive(Debug, Clone)]
pub struct TransformPlan {
    input: ImageHeader,
    header: ImageHeader,
    resolved: ResolvedTransform,
    reslice: Option<ResliceFilter<AffineTransform, InterpolationMethod>>,
}

impl TransformPlan {
    /// Resolve options against the input header.
    pub fn new<P>(options: &ValidatedOptions, input: &ImageHeader, provider: &P) -> Result<Self>
    where
        P: GridProvider + ?Sized,
    {
        options.check_transform_requirements()?;

        let reference = options
            .reference
            .as_deref()
            .map(|path| provider.load_header(path))
            .transpose()?;

        let resolved = TransformResolver::from_options(options, reference.as_ref().map(|h| &h.grid))
            .resolve(&input.grid)?;

        let mut header = input.clone();
        if options.datatype.is_some() {
            header.datatype = options.datatype;
        }

        let reslice = match options.reslice.as_deref() {
            Some(path) => {
                let template = provider.load_header(path)?;

                let (source_transform, world) = resolved.reslice_frame(input.grid.transform());
                let mut source_grid = input.grid.clone();
                source_grid.set_transform(source_transform);

                header.grid.adopt_geometry(&template.grid);
                header.push_comment(format!("resliced to reference image \"{}\"", template.name));

                let filter = ResliceFilter::from_grids(&source_grid, &world, &header.grid, options.interpolation)?
                    .with_datatype(options.datatype);

                info!(
                    "Reslicing \"{}\" onto \"{}\" ({} interpolation, oversampling {})",
                    input.name,
                    template.name,
                    options.interpolation.method,
                    filter.oversample()
                );
                Some(filter)
            }
            None => {
                if resolved.is_supplied() {
                    header.push_comment("transform modified");
                    header
                        .grid
                        .set_transform(resolved.output_transform(input.grid.transform()));
                    info!(
                        "Transform of \"{}\" {}",
                        input.name,
                        if resolved.replace() { "replaced" } else { "modified" }
                    );
                }
                None
            }
        };

        Ok(Self {
            input: input.clone(),
            header,
            resolved,
            reslice,
        })
    }

    /// Header of the output image.
    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// Resolved transform and policy.
    pub fn resolved(&self) -> &ResolvedTransform {
        &self.resolved
    }

    /// Reslice filter, when reslicing was requested.
    pub fn reslice_filter(&self) -> Option<&ResliceFilter<AffineTransform, InterpolationMethod>> {
        self.reslice.as_ref()
    }

    /// Produce the output volume from the input volume.
    pub fn execute<B: Backend>(&self, input: &Image<B>) -> Result<TransformOutput<B>> {
        if input.grid().dims() != self.input.grid.dims() {
            return Err(ResliceError::invalid_grid(format!(
                "volume dimensions {:?} do not match planned input {:?}",
                input.grid().dims(),
                self.input.grid.dims()
            )));
        }

        let image = match &self.reslice {
            Some(filter) => filter.apply(input)?,
            None => self.copy(input)?,
        };

        Ok(TransformOutput {
            header: self.header.clone(),
            image,
        })
    }

    /// Straight copy of the samples under the output header.
    fn copy<B: Backend>(&self, input: &Image<B>) -> Result<Image<B>> {
        match self.header.datatype {
            Some(datatype) if datatype.is_integer() => {
                let source = input.to_buffer()?;
                let dims = source.dims();
                let samples = source.into_vec().into_iter().map(|v| datatype.cast(v)).collect();
                let device = input.data().device();
                Image::from_buffer(VoxelBuffer::new(dims, samples)?, self.header.grid.clone(), &device)
            }
            _ => input.clone().with_grid(self.header.grid.clone()),
        }
    }
}
