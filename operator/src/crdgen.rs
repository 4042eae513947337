use kube::CustomResourceExt;

use fiobench_operator::benchmark::Benchmark;

fn main() {
    print!("{}", serde_yaml::to_string(&Benchmark::crd()).unwrap());
}
