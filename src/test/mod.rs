mod convergence;
mod queues;
