use ffnet::{
    data::DataLoader,
    metrics::{accuracy, confusion_matrix},
    utils::train_test_split,
    Network, OneHotEncoder, TrainConfig, Trainer,
};
use csv::Reader;
use ndarray::{Array2, Axis};
use std::{env, error::Error, path::Path};

// Load iris dataset available here: https://www.kaggle.com/arshid/iris-flower-dataset
fn load_iris(file_path: impl AsRef<Path>) -> Result<(Array2<f64>, Vec<String>), Box<dyn Error>> {
    let mut reader = Reader::from_path(file_path)?;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for row in reader.records() {
        let row = row?;
        ys.push(row[4].to_string());
        for feature in row.iter().take(4) {
            xs.push(feature.parse::<f64>()?);
        }
    }
    Ok((Array2::from_shape_vec((ys.len(), 4), xs)?, ys))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = env::args().nth(1).unwrap_or_else(|| "./IRIS.csv".to_string());
    let (mut xs, ys) = load_iris(path)?;
    // Sigmoid units without bias work best on inputs scaled into [0, 1].
    for mut column in xs.axis_iter_mut(Axis(1)) {
        let max = column.fold(f64::MIN_POSITIVE, |m, &v| m.max(v));
        column.mapv_inplace(|v| v / max);
    }

    let labels = vec!["Iris-setosa", "Iris-versicolor", "Iris-virginica"]
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    let encoder = OneHotEncoder::new(&labels);
    let targets = encoder.encode(&ys)?;

    let (x_train, y_train, x_test, y_test) = train_test_split(&xs, &targets, 0.25, 7)?;
    let mut loader = DataLoader::new(x_train, y_train)?.shuffle(7);

    let config = TrainConfig::default()
        .with_learning_rate(0.3)
        .with_momentum(0.5)
        .with_epochs(2000)
        .with_log_interval(100);
    let trainer = Trainer::new(config)?;
    let mut network = Network::new(&[4, 10, 10, 3], 7)?;
    let report = trainer.train(&mut network, &mut loader)?;
    println!("final training loss: {}", report.final_loss);

    let mut outputs = Array2::zeros((x_test.nrows(), encoder.n_labels()));
    for (row, mut output) in x_test.rows().into_iter().zip(outputs.rows_mut()) {
        output.assign(&network.forward(row)?);
    }
    let y_pred = encoder.decode(outputs.view());
    let y_true = encoder.decode(y_test.view());
    let confusion_matrix = confusion_matrix(&y_true, &y_pred, encoder.labels());

    println!("accuracy: {}", accuracy(&y_true, &y_pred));
    println!("{:?}", confusion_matrix);
    Ok(())
}
