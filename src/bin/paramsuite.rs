// paramsuite binary: runs the bundled demo suites.
// Usage: paramsuite [--config FILE] [--color WHEN] <list | plan [PATTERN] | run [PATTERN]>

fn main() {
    paramsuite::cli::run();
}
