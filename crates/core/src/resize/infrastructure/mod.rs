pub mod square_image_resizer;
