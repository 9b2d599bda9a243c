use varasto_log::{info, warn, error};

use varasto_mem::{DynamicArray, ElementError, dyn_array};

fn print_state(label: &str, array: &DynamicArray<u32>) {
    info!("{:<24} len {:>3}  capacity {:>3}  {:?}", label, array.len(), array.capacity(), array);
}

fn main() -> varasto_log::Result<()> {
    match std::env::var("RUST_LOG") {
        Ok(_) => varasto_log::init()?,
        Err(_) => varasto_log::init_with_filter("info")?,
    }

    let pushes = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                error!("expected a push count, got {:?}", arg);
                std::process::exit(2)
            },
        },
        None => 16,
    };

    let mut array = DynamicArray::new();
    let mut capacity = array.capacity();
    print_state("empty", &array);
    for value in 1..=pushes {
        array.push(value)?;
        if array.capacity() != capacity {
            capacity = array.capacity();
            print_state(&format!("grew at push {}", value), &array);
        }
    }

    let mut scenario = dyn_array![1, 2, 3];
    print_state("scenario", &scenario);
    scenario.erase(0);
    print_state("erase(0)", &scenario);
    scenario.insert(1, 5)?;
    print_state("insert(1, 5)", &scenario);

    let copy = scenario.clone();
    scenario.resize(6)?;
    print_state("resize(6)", &scenario);
    print_state("earlier copy", &copy);

    match scenario.try_emplace_back(|| Err::<u32, _>("rejected by constructor")) {
        Err(ElementError::Element(reason)) => warn!("emplace failed: {}", reason),
        Err(ElementError::Capacity(err)) => error!("emplace failed: {}", err),
        Ok(_) => false,
    };
    print_state("after failed emplace", &scenario);

    Ok(())
}
