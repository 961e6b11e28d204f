use ffnet::{data::DataLoader, metrics::threshold_accuracy, Network, TrainConfig, Trainer};
use ndarray::{arr2, Array2};

// Run with `RUST_LOG=info cargo run --example xor` to follow the loss.
fn main() -> ffnet::Result<()> {
    env_logger::init();

    let input = arr2(&[[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
    let target = arr2(&[[0.0], [1.0], [1.0], [0.0]]);
    let mut loader = DataLoader::new(input.clone(), target.clone())?;

    let config = TrainConfig::default()
        .with_learning_rate(0.5)
        .with_momentum(0.9)
        .with_epochs(5000)
        .with_target_loss(0.01)
        .with_log_interval(500);
    let trainer = Trainer::new(config)?;
    let mut network = Network::new(&[2, 4, 1], 42)?;

    let report = trainer.train(&mut network, &mut loader)?;
    println!(
        "stopped after {} epochs, loss = {}",
        report.epochs, report.final_loss
    );

    let mut outputs = Array2::zeros(target.raw_dim());
    for (row, mut output) in input.rows().into_iter().zip(outputs.rows_mut()) {
        let prediction = network.forward(row)?;
        println!("{} -> {:.4}", row, prediction[0]);
        output.assign(&prediction);
    }
    println!(
        "accuracy: {}",
        threshold_accuracy(outputs.view(), target.view(), 0.5)?
    );
    Ok(())
}
