//! Real-hardware validation. Run with `cargo test -- --ignored` on a host
//! with an OpenCL runtime.
#![cfg(feature = "opencl-runtime")]

use clbench_opencl::{
    device_count, enumerate_platforms, select_device, verify, BenchmarkConfig, KernelSource,
    VectorAddBenchmark, VectorPair, VECTOR_ADD_SOURCE,
};

#[test]
#[ignore = "requires OpenCL runtime - run with --ignored on a GPU machine"]
fn enumeration_lists_at_least_one_device() {
    let platforms = enumerate_platforms().expect("at least one platform");
    let devices = device_count(&platforms);
    assert!(devices >= 1, "no devices on {} platform(s)", platforms.len());
    for p in &platforms {
        for d in &p.devices {
            assert!(!d.name.is_empty());
            assert!(d.compute_units > 0);
        }
    }
}

fn run_small(recompile_each_iteration: bool) {
    let device = select_device(0, 0).expect("device 0 on platform 0");
    let config = BenchmarkConfig {
        list_size: 64 * 256,
        run_times: 4,
        local_work_size: 64,
        recompile_each_iteration,
    };
    let inputs = VectorPair::sequential(config.list_size);
    let source = KernelSource::from_text(VECTOR_ADD_SOURCE);

    let mut bench = VectorAddBenchmark::new(&device, config.clone()).expect("allocate buffers");
    let mut seen = 0;
    let report = bench.run(&inputs, &source, |_| seen += 1).expect("benchmark run");

    assert_eq!(seen, config.run_times);
    assert_eq!(report.iterations.len(), config.run_times);
    assert!(report.output.iter().all(|&c| c as usize == config.list_size));
    assert!(verify(&inputs.a, &inputs.b, &report.output).passed());
    assert_eq!(report.initial_compile_ms.is_some(), !recompile_each_iteration);
}

#[test]
#[ignore = "requires OpenCL runtime - run with --ignored on a GPU machine"]
fn vector_add_recompiling_every_iteration() {
    run_small(true);
}

#[test]
#[ignore = "requires OpenCL runtime - run with --ignored on a GPU machine"]
fn vector_add_compiling_once() {
    run_small(false);
}

#[test]
#[ignore = "requires OpenCL runtime - run with --ignored on a GPU machine"]
fn vector_add_with_split_attributed_declaration() {
    let device = select_device(0, 0).expect("device 0 on platform 0");
    let config = BenchmarkConfig {
        list_size: 64 * 16,
        run_times: 2,
        local_work_size: 64,
        recompile_each_iteration: false,
    };
    let source = KernelSource::from_text(
        "__attribute__((reqd_work_group_size(64, 1, 1))) __kernel void
vector_add(__global const int *A, __global const int *B, __global int *C)
{
    int i = get_global_id(0);
    C[i] = A[i] + B[i];
}
",
    );
    let inputs = VectorPair::sequential(config.list_size);

    let mut bench = VectorAddBenchmark::new(&device, config).expect("allocate buffers");
    let report = bench.run(&inputs, &source, |_| {}).expect("benchmark run");
    assert!(verify(&inputs.a, &inputs.b, &report.output).passed());
}
