use dense_paged_nn::{ActivationFunction, Network, NetworkConfig, Page};

fn main() -> dense_paged_nn::Result<()> {
    env_logger::init();

    let config = NetworkConfig::new(2, 1)
        .with_hidden_layers(2, 4)
        .with_learning_rate(0.1)
        .with_epochs(500_000)
        .with_activation(ActivationFunction::ReLU);
    let mut network = Network::new(config)?;

    // Two pages, as if streamed from a database one page at a time.
    let mut reader = |page: usize, _page_size: usize| match page {
        0 => Some(Page::new(
            vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]],
            vec![vec![0.0], vec![1.0], vec![1.0]],
        )),
        1 => Some(Page::new(vec![vec![1.0, 1.0]], vec![vec![0.0]])),
        _ => None,
    };

    let loss = network.train_batch(4, &mut reader, 3)?;
    println!("Final loss: {loss:.6}");

    for input in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]] {
        println!("Input: {:?} -> Output: {:.4}", input, network.forward_pass(&input)?[0]);
    }
    Ok(())
}
