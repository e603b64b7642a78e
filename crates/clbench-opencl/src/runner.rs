//! The vector-add benchmark loop on a single in-order command queue.

use std::ptr;
use std::time::{Duration, Instant};

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::kernel::{ExecuteKernel, Kernel};
use opencl3::memory::{Buffer, ClMem, CL_MEM_READ_ONLY, CL_MEM_WRITE_ONLY};
use opencl3::program::Program;
use opencl3::types::{cl_int, CL_BLOCKING};
use tracing::{debug, info, trace, warn};

use crate::benchmark::{BenchmarkConfig, BenchmarkReport, IterationTiming};
use crate::device::OpenClDevice;
use crate::error::{OpenClError, Result};
use crate::kernel::{self, KernelSource, KERNEL_NAME};
use crate::reference::VectorPair;
use crate::stats::Statistics;

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Context, queue and device buffers for one benchmark run.
///
/// Buffers are allocated once in [`VectorAddBenchmark::new`] and released
/// when the benchmark is dropped.
pub struct VectorAddBenchmark {
    platform_name: String,
    device_name: String,
    config: BenchmarkConfig,
    // Field order is drop order: buffers and queue before the context.
    a_mem: Buffer<cl_int>,
    b_mem: Buffer<cl_int>,
    c_mem: Buffer<cl_int>,
    queue: CommandQueue,
    context: Context,
}

impl std::fmt::Debug for VectorAddBenchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorAddBenchmark")
            .field("platform_name", &self.platform_name)
            .field("device_name", &self.device_name)
            .field("config", &self.config)
            .finish()
    }
}

impl VectorAddBenchmark {
    /// Create a context and command queue on `device` and allocate the two
    /// read-only input buffers and the write-only output buffer.
    pub fn new(device: &OpenClDevice, config: BenchmarkConfig) -> Result<Self> {
        config.validate()?;

        let context = Context::from_device(&device.device)
            .map_err(|e| OpenClError::ContextCreationFailed(e.to_string()))?;
        let queue = CommandQueue::create_default_with_properties(&context, 0, 0)
            .map_err(|e| OpenClError::ContextCreationFailed(format!("command queue: {e}")))?;

        let n = config.list_size;
        let size_bytes = config.buffer_bytes()?;
        let alloc = |flags, label: &str| {
            // SAFETY: no host pointer is supplied, the runtime owns the storage.
            let buffer = unsafe { Buffer::<cl_int>::create(&context, flags, n, ptr::null_mut()) };
            buffer.map_err(|e| OpenClError::BufferAllocationFailed {
                size_bytes,
                reason: format!("buffer {label}: {e}"),
            })
        };
        let a_mem = alloc(CL_MEM_READ_ONLY, "A")?;
        let b_mem = alloc(CL_MEM_READ_ONLY, "B")?;
        let c_mem = alloc(CL_MEM_WRITE_ONLY, "C")?;
        debug!("allocated 3 x {} bytes on {}", size_bytes, device.name);

        Ok(Self {
            platform_name: device.platform_name.clone(),
            device_name: device.name.clone(),
            config,
            a_mem,
            b_mem,
            c_mem,
            queue,
            context,
        })
    }

    fn upload(&mut self, inputs: &VectorPair) -> Result<()> {
        // SAFETY: blocking writes of host slices sized exactly like the buffers.
        unsafe {
            self.queue
                .enqueue_write_buffer(&mut self.a_mem, CL_BLOCKING, 0, inputs.a.as_slice(), &[])
                .map_err(|e| OpenClError::DataTransferFailed(format!("write A: {e}")))?;
            self.queue
                .enqueue_write_buffer(&mut self.b_mem, CL_BLOCKING, 0, inputs.b.as_slice(), &[])
                .map_err(|e| OpenClError::DataTransferFailed(format!("write B: {e}")))?;
        }
        Ok(())
    }

    fn dispatch(&self, kernel: &Kernel) -> Result<()> {
        // SAFETY: the three arguments match the kernel's `__global int*`
        // parameters and the global size equals the buffer length.
        let event = unsafe {
            ExecuteKernel::new(kernel)
                .set_arg(&self.a_mem.get())
                .set_arg(&self.b_mem.get())
                .set_arg(&self.c_mem.get())
                .set_global_work_size(self.config.list_size)
                .set_local_work_size(self.config.local_work_size)
                .enqueue_nd_range(&self.queue)
        };
        event.map_err(|e| OpenClError::KernelExecutionFailed {
            kernel_name: KERNEL_NAME.into(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn read_back(&self) -> Result<Vec<i32>> {
        let mut output = vec![0; self.config.list_size];
        // SAFETY: `output` has exactly as many elements as the buffer.
        unsafe {
            self.queue
                .enqueue_read_buffer(&self.c_mem, CL_BLOCKING, 0, output.as_mut_slice(), &[])
                .map_err(|e| OpenClError::DataTransferFailed(format!("read C: {e}")))?;
        }
        self.queue
            .flush()
            .and_then(|()| self.queue.finish())
            .map_err(|e| OpenClError::DataTransferFailed(format!("finish: {e}")))?;
        Ok(output)
    }

    /// Run the benchmark loop and read the result back once.
    ///
    /// `on_iteration` is called after every dispatch, e.g. to drive a
    /// progress bar.
    pub fn run(
        &mut self,
        inputs: &VectorPair,
        source: &KernelSource,
        mut on_iteration: impl FnMut(&IterationTiming),
    ) -> Result<BenchmarkReport> {
        if inputs.len() != self.config.list_size || inputs.b.len() != self.config.list_size {
            return Err(OpenClError::InvalidConfig(format!(
                "input vectors have {}/{} elements, buffers hold {}",
                inputs.a.len(),
                inputs.b.len(),
                self.config.list_size
            )));
        }
        if !source.declares_kernel(KERNEL_NAME) {
            warn!(
                "{} does not appear to declare __kernel {}; the driver will decide",
                source.path().display(),
                KERNEL_NAME
            );
        }

        let started = Instant::now();
        let recompile = self.config.recompile_each_iteration;

        let mut compiled: Option<(Program, Kernel)> = None;
        let mut initial_compile_ms = None;
        if !recompile {
            let t = Instant::now();
            compiled = Some(kernel::compile(&self.context, source)?);
            initial_compile_ms = Some(ms(t.elapsed()));
        }

        info!(
            "running {} iterations of {} over {} elements on {}",
            self.config.run_times, KERNEL_NAME, self.config.list_size, self.device_name
        );

        let mut iterations = Vec::with_capacity(self.config.run_times);
        let mut durations = Vec::with_capacity(self.config.run_times);
        for iteration in 0..self.config.run_times {
            let t0 = Instant::now();
            self.upload(inputs)?;
            let t1 = Instant::now();

            if recompile {
                // The previous program and kernel are released on reassignment.
                compiled = Some(kernel::compile(&self.context, source)?);
            }
            let t2 = Instant::now();

            if let Some((_, kernel)) = &compiled {
                self.dispatch(kernel)?;
            }
            let t3 = Instant::now();

            let timing = IterationTiming {
                iteration,
                upload_ms: ms(t1 - t0),
                compile_ms: ms(t2 - t1),
                dispatch_ms: ms(t3 - t2),
                total_ms: ms(t3 - t0),
            };
            trace!("iteration {}: {:.3} ms", iteration, timing.total_ms);
            on_iteration(&timing);
            iterations.push(timing);
            durations.push(t3 - t0);
        }

        let t = Instant::now();
        let output = self.read_back()?;
        let readback_ms = ms(t.elapsed());
        drop(compiled);

        Ok(BenchmarkReport {
            platform_name: self.platform_name.clone(),
            device_name: self.device_name.clone(),
            config: self.config.clone(),
            initial_compile_ms,
            statistics: Statistics::from_durations(&durations, self.config.list_size),
            iterations,
            readback_ms,
            total_duration_ms: ms(started.elapsed()),
            verification: None,
            output,
        })
    }
}
