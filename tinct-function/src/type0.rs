use crate::clamp::{Clamper, TupleVec, clamp, interpolate, read_pairs, read_required};
use crate::error::{FunctionError, Result, bail};
use crate::log::lwarn;
use smallvec::{SmallVec, smallvec};
use tinct_syntax::keys::{BITS_PER_SAMPLE, DECODE, DOMAIN, ENCODE, ORDER, SIZE};
use tinct_syntax::{Array, BitReader, BitSize, Stream, XRef};

/// The maximum number of inputs of a sampled function. Every evaluation visits
/// `2^n` samples per output.
const MAX_INPUTS: usize = 16;

/// A type 0 function (sampled function).
#[derive(Debug)]
pub(crate) struct Type0 {
    clamper: Clamper,
    sizes: SmallVec<[usize; 4]>,
    encode: TupleVec,
    decode: TupleVec,
    max_sample: f64,
    samples: Vec<f64>,
    num_outputs: usize,
}

impl Type0 {
    /// Create a new type 0 function.
    pub(crate) fn new(stream: &Stream, xref: &XRef) -> Result<Self> {
        let dict = stream.dict();
        let clamper = Clamper::new(dict, xref)?;
        let range = clamper.required_range()?.clone();
        let num_inputs = clamper.domain.len();
        let num_outputs = range.len();

        if num_inputs > MAX_INPUTS {
            bail!(FunctionError::InvalidEntry(DOMAIN));
        }

        let bits_per_sample = read_required::<u8>(dict, BITS_PER_SAMPLE, xref)?;

        if !matches!(bits_per_sample, 1 | 2 | 4 | 8 | 12 | 16 | 24 | 32) {
            bail!(FunctionError::InvalidEntry(BITS_PER_SAMPLE));
        }

        let bit_size =
            BitSize::from_u8(bits_per_sample).ok_or(FunctionError::InvalidEntry(BITS_PER_SAMPLE))?;

        if dict.contains_key(ORDER) {
            match read_required::<i32>(dict, ORDER, xref)? {
                1 => {}
                3 => {
                    lwarn!("cubic spline interpolation is unsupported, falling back to linear");
                }
                _ => bail!(FunctionError::InvalidEntry(ORDER)),
            }
        }

        let sizes = read_required::<Array>(dict, SIZE, xref)?
            .to_vec::<u32>(xref)
            .ok_or(FunctionError::InvalidEntry(SIZE))?
            .into_iter()
            .map(|s| s as usize)
            .collect::<SmallVec<[usize; 4]>>();

        if sizes.len() != num_inputs || sizes.contains(&0) {
            bail!(FunctionError::InvalidEntry(SIZE));
        }

        let num_samples = sizes
            .iter()
            .try_fold(num_outputs, |acc, s| acc.checked_mul(*s))
            .ok_or(FunctionError::InvalidEntry(SIZE))?;

        let encode = read_pairs(dict, ENCODE, xref)?
            .unwrap_or_else(|| sizes.iter().map(|s| (0.0, (*s - 1) as f64)).collect());

        if encode.len() < num_inputs {
            bail!(FunctionError::InvalidEntry(ENCODE));
        }

        let decode = read_pairs(dict, DECODE, xref)?.unwrap_or(range);

        if decode.len() < num_outputs {
            bail!(FunctionError::InvalidEntry(DECODE));
        }

        let data = stream.decoded()?;
        let samples = read_samples(&data, bit_size, num_samples);

        Ok(Self {
            clamper,
            sizes,
            encode,
            decode,
            max_sample: bit_size.mask() as f64,
            samples,
            num_outputs,
        })
    }

    pub(crate) fn num_inputs(&self) -> usize {
        self.sizes.len()
    }

    pub(crate) fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub(crate) fn clamper(&self) -> &Clamper {
        &self.clamper
    }

    /// Evaluate the function using multilinear interpolation between the
    /// `2^m` samples surrounding the input.
    pub(crate) fn eval(&self, src: &[f64], dest: &mut [f64]) {
        let cube_vertices = 1_usize << self.num_inputs();
        let mut weights: SmallVec<[f64; 16]> = smallvec![1.0; cube_vertices];
        let mut vertices: SmallVec<[usize; 16]> = smallvec![0; cube_vertices];
        // The distance between neighbouring samples in the current dimension.
        let mut stride = self.num_outputs;

        for (dim, ((x, (d_min, d_max)), ((e_min, e_max), size))) in src
            .iter()
            .zip(self.clamper.domain.iter())
            .zip(self.encode.iter().zip(self.sizes.iter()))
            .enumerate()
        {
            let x = clamp(*x, *d_min, *d_max);
            let last = (*size - 1) as f64;
            let e = clamp(interpolate(x, *d_min, *d_max, *e_min, *e_max), 0.0, last);

            let (e0, w0, w1) = if *size == 1 {
                (0, 1.0, 0.0)
            } else if e < last {
                let floor = e.floor();
                (floor as usize, floor + 1.0 - e, e - floor)
            } else {
                (*size - 2, 0.0, 1.0)
            };

            let offset0 = e0 * stride;
            let offset1 = if *size == 1 { offset0 } else { offset0 + stride };
            let bit = 1 << dim;

            for (vertex, (weight, index)) in weights.iter_mut().zip(vertices.iter_mut()).enumerate() {
                if vertex & bit != 0 {
                    *weight *= w1;
                    *index += offset1;
                } else {
                    *weight *= w0;
                    *index += offset0;
                }
            }

            stride *= *size;
        }

        for (j, (out, (dec_min, dec_max))) in dest.iter_mut().zip(self.decode.iter()).enumerate() {
            let r = weights
                .iter()
                .zip(vertices.iter())
                .map(|(weight, index)| self.sample(index + j) * weight)
                .sum::<f64>();

            *out = interpolate(r, 0.0, self.max_sample, *dec_min, *dec_max);
        }

        self.clamper.clamp_output(dest);
    }

    #[inline]
    fn sample(&self, index: usize) -> f64 {
        // Missing samples are treated as zero.
        self.samples.get(index).copied().unwrap_or(0.0)
    }
}

fn read_samples(data: &[u8], bit_size: BitSize, count: usize) -> Vec<f64> {
    let available = data.len() * 8 / bit_size.bits();
    let mut samples = Vec::with_capacity(count.min(available));
    let mut reader = BitReader::new(data);

    while samples.len() < count {
        match reader.read(bit_size) {
            Some(sample) => samples.push(sample as f64),
            None => break,
        }
    }

    if samples.len() < count {
        lwarn!(
            "sampled function has {} of {} samples, padding with zeros",
            samples.len(),
            count
        );
    } else if data.len() > count.saturating_mul(bit_size.bits()).div_ceil(8) {
        lwarn!(
            "sampled function has more data than its {} samples, ignoring the rest",
            count
        );
    }

    samples
}
